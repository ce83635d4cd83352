//! Terminal rendering of a navigation session.

use navflow_shared::{
    favorites::FavoritesSet,
    storage::Density,
    Dictionary, LinkGroup, LinkItem, Locale,
};

const UNNAMED_LINK: &str = "未命名";
const DEFAULT_ICON: &str = "↗";
const CUSTOM_ICON: &str = "▣";
const FAVORITE_MARK: &str = "★";

/// Everything that changes how cards look.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Display locale.
    pub locale: Locale,
    /// Card density.
    pub density: Density,
    /// Lower-cased, trimmed substring filter; empty shows everything.
    pub filter: String,
}

impl RenderOptions {
    /// Options with a raw user filter normalized.
    pub fn new(locale: Locale, density: Density, filter: Option<&str>) -> Self {
        Self {
            locale,
            density,
            filter: filter.unwrap_or_default().trim().to_lowercase(),
        }
    }

    fn shows(&self, link: &LinkItem) -> bool {
        self.filter.is_empty() || link.search_text().contains(&self.filter)
    }
}

/// Page header: localized site title.
pub fn render_header(dictionary: &Dictionary) -> String {
    let title = dictionary.t("siteTitle");
    format!("{title}\n{}\n", "=".repeat(title.chars().count().max(8)))
}

/// One section per group, one line per visible card. Sections whose cards
/// are all filtered out are omitted.
pub fn render_groups(
    groups: &[&LinkGroup],
    favorites: &FavoritesSet,
    options: &RenderOptions,
) -> String {
    let mut out = String::new();
    for group in groups {
        let visible = group
            .links
            .iter()
            .filter(|link| options.shows(link))
            .collect::<Vec<_>>();
        if visible.is_empty() {
            continue;
        }

        out.push_str(&format!("\n## {}\n", options.locale.pick_pair(group.title_pair())));
        for link in visible {
            out.push_str(&render_card(link, favorites, options));
        }
    }
    out
}

fn render_card(link: &LinkItem, favorites: &FavoritesSet, options: &RenderOptions) -> String {
    let marker = if favorites.contains_link(link) { FAVORITE_MARK } else { " " };
    let icon = if link.icon.as_deref().is_some_and(|icon| !icon.trim().is_empty()) {
        CUSTOM_ICON
    } else {
        DEFAULT_ICON
    };
    let name = options.locale.pick_pair(link.name_pair());
    let name = if name.is_empty() { UNNAMED_LINK } else { name };
    let url = if link.url.trim().is_empty() { "#" } else { link.url.trim() };

    let mut line = format!("  {marker} {icon} {name}");
    let desc = options.locale.pick_pair(link.desc_pair());
    if options.density == Density::Standard && !desc.is_empty() {
        line.push_str(&format!(" — {desc}"));
    }
    line.push_str(&format!("  <{url}>"));
    if link.open_target() != "_blank" {
        line.push_str(&format!(" [{}]", link.open_target()));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use navflow_shared::model::Tags;

    use super::*;

    fn groups() -> Vec<LinkGroup> {
        vec![LinkGroup {
            title: "常用".to_string(),
            title_en: "Daily".to_string(),
            links: vec![
                LinkItem {
                    name: "邮箱".to_string(),
                    name_en: "Mail".to_string(),
                    desc: "公司邮箱".to_string(),
                    url: "https://mail.corp".to_string(),
                    ..LinkItem::default()
                },
                LinkItem {
                    name_en: "Board".to_string(),
                    icon: Some("https://cdn/board.png".to_string()),
                    target: "_self".to_string(),
                    tags: Tags::Many(vec!["whiteboard".to_string()]),
                    ..LinkItem::default()
                },
            ],
        }]
    }

    #[test]
    fn renders_localized_cards_with_favorite_marker() {
        let groups = groups();
        let favorites: FavoritesSet = ["https://mail.corp"].into_iter().collect();
        let options = RenderOptions::new(Locale::ZhCn, Density::Standard, None);
        let text = render_groups(&groups.iter().collect::<Vec<_>>(), &favorites, &options);

        assert!(text.contains("## 常用"));
        assert!(text.contains("  ★ ↗ 邮箱 — 公司邮箱  <https://mail.corp>"));
        assert!(text.contains("    ▣ Board  <#> [_self]"));
    }

    #[test]
    fn section_and_card_lines_are_exact() {
        let groups = groups();
        let options = RenderOptions::new(Locale::ZhCn, Density::Compact, Some("mail"));
        let text = render_groups(&groups.iter().collect::<Vec<_>>(), &FavoritesSet::default(), &options);
        assert_eq!(text, "\n## 常用\n    ↗ 邮箱  <https://mail.corp>\n");
    }

    #[test]
    fn english_compact_drops_descriptions() {
        let groups = groups();
        let options = RenderOptions::new(Locale::EnUs, Density::Compact, None);
        let text = render_groups(&groups.iter().collect::<Vec<_>>(), &FavoritesSet::default(), &options);

        assert!(text.contains("## Daily"));
        assert!(text.contains("Mail  <https://mail.corp>"));
        assert!(!text.contains("公司邮箱"));
    }

    #[test]
    fn filter_hides_cards_and_empty_sections() {
        let groups = groups();
        let refs = groups.iter().collect::<Vec<_>>();

        let options = RenderOptions::new(Locale::EnUs, Density::Standard, Some("  WHITE "));
        let text = render_groups(&refs, &FavoritesSet::default(), &options);
        assert!(text.contains("Board"));
        assert!(!text.contains("Mail"));

        let options = RenderOptions::new(Locale::EnUs, Density::Standard, Some("nothing"));
        assert_eq!(render_groups(&refs, &FavoritesSet::default(), &options), "");
    }
}
