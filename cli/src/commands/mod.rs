//! Subcommand implementations and the state they share.

pub mod env;
pub mod favorite;
pub mod prefs;
pub mod resolve;
pub mod show;

use anyhow::Result;
use navflow_shared::{
    loader::load_dictionary,
    pipeline::run_session,
    probe::HttpProber,
    storage::{FileStore, Preferences},
    ConfigFetchError, Dictionary, Locale, Session,
};

use crate::{
    cli::{Cli, Commands},
    config::CliConfig,
    site::SiteSource,
};

/// Everything a command needs: configuration, persisted preferences, the
/// document source and the prober.
pub struct App {
    config: CliConfig,
    prefs: Preferences<FileStore>,
    source: SiteSource,
    prober: HttpProber,
}

impl App {
    /// Open the state file and build the source and prober.
    pub fn open(config: CliConfig) -> Result<Self> {
        let source = SiteSource::open(&config.source, config.http_timeout)?;
        let prober = HttpProber::new(source.is_secure())?;
        let prefs = Preferences::new(FileStore::open(&config.state_path));
        Ok(Self {
            config,
            prefs,
            source,
            prober,
        })
    }

    /// Persisted preferences.
    pub fn prefs(&self) -> &Preferences<FileStore> {
        &self.prefs
    }

    /// Mutable persisted preferences.
    pub fn prefs_mut(&mut self) -> &mut Preferences<FileStore> {
        &mut self.prefs
    }

    /// Effective display locale.
    pub fn locale(&self) -> Locale {
        self.prefs.locale(self.config.system_locale.as_deref())
    }

    /// Host language tag, if known.
    pub fn system_locale(&self) -> Option<&str> {
        self.config.system_locale.as_deref()
    }

    /// UI dictionary for the current locale.
    pub async fn dictionary(&self) -> Dictionary {
        load_dictionary(&self.source, self.locale()).await
    }

    /// Run the full pipeline from the environment descriptor onwards.
    pub async fn session(&self) -> Result<Session, ConfigFetchError> {
        run_session(
            &self.source,
            &self.prober,
            self.prefs.env_override(),
            &self.prefs.favorites(),
        )
        .await
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::from_env().with_overrides(cli.source, cli.state);
    let mut app = App::open(config)?;

    let output = match cli.command {
        Commands::Show {
            filter,
        } => show::run(&app, filter.as_deref()).await?,
        Commands::Resolve {
            json,
        } => resolve::run(&app, json).await?,
        Commands::Env {
            mode,
        } => env::run(&mut app, mode.into()).await?,
        Commands::Favorite {
            key,
        } => favorite::toggle(&mut app, &key).await?,
        Commands::Favorites => favorite::list(&app),
        Commands::Lang {
            code,
            next,
        } => prefs::lang(&mut app, code.as_deref(), next)?,
        Commands::Density => prefs::density(&mut app)?,
        Commands::Theme => prefs::theme(&mut app)?,
        Commands::Prefs => prefs::show(&app)?,
    };
    print!("{output}");
    Ok(())
}
