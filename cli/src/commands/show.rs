//! `show`: the full page.

use anyhow::{bail, Result};
use navflow_shared::{
    status::StatusMessage,
    storage::{Density, Theme},
    Dictionary, EnvMode, Session,
};

use super::App;
use crate::render::{render_groups, render_header, RenderOptions};

/// Load a fresh session and render the whole page.
pub async fn run(app: &App, filter: Option<&str>) -> Result<String> {
    let dictionary = app.dictionary().await;
    let session = match app.session().await {
        Ok(session) => session,
        Err(err) => {
            tracing::error!("navigation load failed: {err}");
            // Fatal: only the status line, never a partial page.
            bail!("{}", StatusMessage::failed(&err).render(&dictionary));
        },
    };
    Ok(render_page(app, &session, &dictionary, filter))
}

/// Header, status line, then favorites and merged groups.
pub fn render_page(
    app: &App,
    session: &Session,
    dictionary: &Dictionary,
    filter: Option<&str>,
) -> String {
    let prefs = app.prefs();
    let options = RenderOptions::new(app.locale(), prefs.density(), filter);

    let mut page = render_header(dictionary);
    page.push_str(&render_controls(app, dictionary));
    page.push_str(&session.status().render(dictionary));
    page.push('\n');
    page.push_str(&render_groups(&session.display_groups(), &prefs.favorites(), &options));
    page
}

/// Current override, language, density and theme with localized labels.
fn render_controls(app: &App, dictionary: &Dictionary) -> String {
    let prefs = app.prefs();
    let env_key = match prefs.env_override().unwrap_or_default() {
        EnvMode::Auto => "envAuto",
        EnvMode::Intranet => "envIntranet",
        EnvMode::Internet => "envInternet",
    };
    let density_key = match prefs.density() {
        Density::Standard => "densityStandard",
        Density::Compact => "densityCompact",
    };
    let theme_mark = match prefs.theme() {
        Theme::Light => "☀",
        Theme::Dark => "☾",
    };
    format!(
        "{}：{}  {}：{}  {}：{}  {} {}\n",
        dictionary.t("envLabel"),
        dictionary.t(env_key),
        dictionary.t("langLabel"),
        app.locale(),
        dictionary.t("densityToggle"),
        dictionary.t(density_key),
        dictionary.t("themeToggle"),
        theme_mark,
    )
}
