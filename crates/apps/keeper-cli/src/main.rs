use anyhow::Result;
use clap::{Parser, Subcommand};
use keeper_core::models::{BackupKind, Frequency, LoggingConfig, ProviderKind};
use keeper_core::policy::UseCase;
use keeper_core::ports::ConfigStore;
use keeper_core::FileConfigStore;
use std::path::PathBuf;

mod handlers;
mod logging;
mod ui;

#[derive(Parser)]
#[command(name = "keeper")]
#[command(version)]
#[command(about = "Keeper - backup policy and retention manager", long_about = None)]
#[command(styles = styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn styles() -> clap::builder::Styles {
    use clap::builder::styling::{AnsiColor, Effects, Styles};
    Styles::styled()
        .header(AnsiColor::Magenta.on_default() | Effects::BOLD)
        .usage(AnsiColor::Magenta.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show or change configuration")]
    Config {
        #[arg(long, short)]
        get: Option<String>,
        #[arg(long, short)]
        set: Option<String>,
        #[arg(long)]
        reset: bool,
    },
    #[command(about = "Project how many backups a retention policy keeps")]
    Retention {
        #[arg(long, short)]
        kind: Option<BackupKind>,
        #[arg(long, short)]
        frequency: Option<Frequency>,
    },
    #[command(about = "Validate backup policies, providers and schedule")]
    Validate,
    #[command(about = "Show or apply a policy preset")]
    Preset {
        use_case: UseCase,
        #[arg(long)]
        apply: bool,
    },
    #[command(about = "Check and attach a provider credentials file")]
    Credentials {
        provider: ProviderKind,
        file: PathBuf,
    },
    #[command(about = "Show, set or toggle the backup schedule")]
    Schedule {
        #[command(subcommand)]
        action: Option<ScheduleAction>,
    },
    #[command(about = "List storage providers and their status")]
    Providers,
    #[command(about = "Show recent backup runs and statistics")]
    History {
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },
    #[command(about = "Run a backup now")]
    Run {
        #[arg(long, short)]
        kind: Option<BackupKind>,
        #[arg(long)]
        engine: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    #[command(about = "Preview the schedule")]
    Show,
    #[command(about = "Change the schedule")]
    Set {
        #[arg(long, short)]
        frequency: Option<Frequency>,
        #[arg(long, short)]
        day: Option<u32>,
        /// HH:MM, 24-hour
        #[arg(long, short)]
        time: Option<String>,
        #[arg(long)]
        cron: Option<String>,
        #[arg(long, short)]
        kind: Option<BackupKind>,
    },
    #[command(about = "Enable or disable the schedule")]
    Toggle,
    #[command(about = "List frequencies, time slots and cron examples")]
    Templates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = FileConfigStore::from_env()?;
    // A corrupt document must not stop logging or `config --reset`.
    let (logging, unreadable) = match store.peek().await {
        Ok(config) => (config.map(|c| c.logging).unwrap_or_default(), None),
        Err(e) => (LoggingConfig::default(), Some(e)),
    };
    let _logger = logging::init(&logging);
    log::info!("keeper v{} starting up", env!("CARGO_PKG_VERSION"));
    if let Some(e) = unreadable {
        log::warn!("{}", e);
    }

    match cli.command {
        Commands::Config { get, set, reset } => {
            handlers::config::handle_config(&store, get, set, reset).await
        }
        Commands::Retention { kind, frequency } => {
            handlers::retention::handle_retention(&store.load().await?, kind, frequency)
        }
        Commands::Validate => handlers::validate::handle_validate(&store.load().await?),
        Commands::Preset { use_case, apply } => {
            handlers::preset::handle_preset(&store, use_case, apply).await
        }
        Commands::Credentials { provider, file } => {
            handlers::credentials::handle_credentials(&store, provider, file).await
        }
        Commands::Schedule { action } => {
            handlers::schedule::handle_schedule(&store, action.unwrap_or(ScheduleAction::Show))
                .await
        }
        Commands::Providers => handlers::providers::handle_providers(&store.load().await?),
        Commands::History { limit } => {
            handlers::history::handle_history(&store.load().await?, limit)
        }
        Commands::Run { kind, engine } => handlers::run::handle_run(&store, kind, engine).await,
    }
}
