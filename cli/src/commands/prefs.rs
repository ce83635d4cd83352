//! Locale, density and theme preferences.

use anyhow::{anyhow, Result};
use navflow_shared::Locale;

use super::App;

/// Set, cycle or print the display locale.
pub fn lang(app: &mut App, code: Option<&str>, next: bool) -> Result<String> {
    let locale = if next {
        let system = app.system_locale().map(str::to_string);
        app.prefs_mut().cycle_locale(system.as_deref())?
    } else if let Some(code) = code {
        let locale = code.parse::<Locale>().map_err(|err| anyhow!(err))?;
        app.prefs_mut().set_locale(locale)?;
        locale
    } else {
        app.locale()
    };
    Ok(format!("locale: {locale}\n"))
}

/// Toggle card density.
pub fn density(app: &mut App) -> Result<String> {
    let density = app.prefs_mut().toggle_density()?;
    Ok(format!("density: {density}\n"))
}

/// Toggle the theme.
pub fn theme(app: &mut App) -> Result<String> {
    let theme = app.prefs_mut().toggle_theme()?;
    Ok(format!("theme: {theme}\n"))
}

/// Print every persisted preference.
pub fn show(app: &App) -> Result<String> {
    let prefs = app.prefs();
    let env_override = prefs
        .env_override()
        .map(|mode| mode.to_string())
        .unwrap_or_else(|| "auto".to_string());
    Ok(format!(
        "theme: {}\nlocale: {}\ndensity: {}\nenvironment override: {}\nfavorites: {}\nstate file: {}\n",
        prefs.theme(),
        app.locale(),
        prefs.density(),
        env_override,
        prefs.favorites().len(),
        prefs.store().path().display(),
    ))
}
