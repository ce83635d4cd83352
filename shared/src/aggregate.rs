//! Merging the common and context-specific link documents.

use std::collections::HashMap;

use crate::model::LinkGroup;

/// Merge key used for groups published without a title.
pub const UNNAMED_GROUP_TITLE: &str = "未命名";

/// Merge `common` then `context` into one ordered group list.
///
/// Groups are coalesced by primary-locale title. The first occurrence fixes
/// the group's position and its secondary title (falling back to the primary
/// title); later occurrences only append their links. Links are never
/// deduplicated here.
pub fn merge_groups(common: &[LinkGroup], context: &[LinkGroup]) -> Vec<LinkGroup> {
    let mut merged: Vec<LinkGroup> = Vec::new();
    let mut index_by_title: HashMap<String, usize> = HashMap::new();

    for group in common.iter().chain(context) {
        let key = if group.title.is_empty() { UNNAMED_GROUP_TITLE } else { group.title.as_str() };
        let slot = match index_by_title.get(key) {
            Some(&slot) => slot,
            None => {
                let title_en = if group.title_en.is_empty() { key } else { group.title_en.as_str() };
                merged.push(LinkGroup {
                    title: key.to_string(),
                    title_en: title_en.to_string(),
                    links: Vec::new(),
                });
                index_by_title.insert(key.to_string(), merged.len() - 1);
                merged.len() - 1
            },
        };
        merged[slot].links.extend(group.links.iter().cloned());
    }

    tracing::debug!(
        groups = merged.len(),
        links = merged.iter().map(|group| group.links.len()).sum::<usize>(),
        "link documents merged"
    );
    merged
}
