//! `favorite` and `favorites`.

use anyhow::{bail, Result};
use navflow_shared::status::StatusMessage;

use super::{show, App};

/// Toggle `key`, then re-synthesize the favorites group from the stored set
/// and render the page again.
///
/// A key with no matching link can only be removed, which is how stale
/// favorites are cleaned up.
pub async fn toggle(app: &mut App, key: &str) -> Result<String> {
    let dictionary = app.dictionary().await;
    let session = match app.session().await {
        Ok(session) => session,
        Err(err) => bail!("{}", StatusMessage::failed(&err).render(&dictionary)),
    };

    let key = key.trim();
    let favorited = match session.find_link(key) {
        Some(link) => app.prefs_mut().toggle_favorite(link)?,
        None if app.prefs().favorites().contains(key) => {
            app.prefs_mut().toggle_favorite_key(key)?
        },
        None => bail!("no link with identity key {key}"),
    };

    let session = session.with_favorites(&app.prefs().favorites());
    let verb = if favorited { "added" } else { "removed" };
    let page = show::render_page(app, &session, &dictionary, None);
    Ok(format!("favorite {verb}: {key}\n{page}"))
}

/// Stored favorite keys, one per line.
pub fn list(app: &App) -> String {
    app.prefs()
        .favorites()
        .iter()
        .map(|key| format!("{key}\n"))
        .collect()
}
