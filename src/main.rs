use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use clipring::{
    config::{APP_NAME, Config},
    menu::{
        controller::{MenuController, SelectOutcome},
        editor::{self, EditOutcome},
        picker::{ROFI_INFO_ENV, Selection, write_rows},
    },
    persist::open_backend,
    ports::{
        Notifier,
        clipboard::SystemClipboard,
        notify::{DesktopNotifier, SilentNotifier},
    },
    runtime::{
        handoff::{HandoffError, HandoffListener},
        watcher::{Watcher, WatcherConfig},
    },
    types::MenuMode,
};

/// Clipboard history for rofi and dmenu.
#[derive(Debug, Parser)]
#[command(name = "clipring", version, about)]
struct Cli {
    /// Settings file (default: <config dir>/clipring/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress desktop notifications
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Raise log verbosity (stderr)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Watch the clipboard and serve menu copies
    Daemon,
    /// rofi script mode: list rows, or act on the chosen row
    Menu {
        #[arg(value_enum, default_value_t = ModeArg::Runtime)]
        mode: ModeArg,
        /// Row chosen in the picker
        item: Option<String>,
    },
    /// Act on a row chosen in a picker
    #[command(alias = "paste")]
    Select {
        #[arg(value_enum)]
        mode: ModeArg,
        item: String,
    },
    /// Add the clipboard text to the persistent store
    Add,
    /// Remove the clipboard text from the persistent store
    Remove,
    /// Clear the history ring
    Clear,
    /// Edit the persistent store in $EDITOR
    Edit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Runtime,
    Persistent,
    Actions,
}

impl From<ModeArg> for MenuMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Runtime => MenuMode::Runtime,
            ModeArg::Persistent => MenuMode::Persistent,
            ModeArg::Actions => MenuMode::Actions,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    let mut config = Config::load(cli.config.as_deref()).context("loading settings")?;
    if cli.quiet {
        config.silence();
    }

    match cli.command {
        Commands::Daemon => run_daemon(config).await,
        Commands::Menu { mode, item } => {
            let rofi_info = std::env::var(ROFI_INFO_ENV).ok();
            let selection = Selection::from_picker(
                config.settings.row_index,
                rofi_info.as_deref(),
                item.as_deref(),
            );
            match selection {
                Some(selection) => select(&config, mode.into(), &selection),
                None => show(&config, mode.into()),
            }
        }
        Commands::Select { mode, item } => {
            let rofi_info = std::env::var(ROFI_INFO_ENV).ok();
            match Selection::from_picker(config.settings.row_index, rofi_info.as_deref(), Some(item.as_str())) {
                Some(selection) => select(&config, mode.into(), &selection),
                None => Ok(()),
            }
        }
        Commands::Add => {
            controller(&config)?.add_current().context("adding to persistent store")?;
            Ok(())
        }
        Commands::Remove => {
            controller(&config)?
                .remove_current()
                .context("removing from persistent store")?;
            Ok(())
        }
        Commands::Clear => {
            controller(&config)?.clear().context("clearing history")?;
            Ok(())
        }
        Commands::Edit => {
            let argv = editor::editor_command(std::env::var("EDITOR").ok().as_deref());
            let outcome = controller(&config)?
                .edit_persistent(&argv)
                .context("editing persistent store")?;
            if outcome == EditOutcome::Aborted {
                warn!("editor exited with an error, persistent store unchanged");
            }
            Ok(())
        }
    }
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base = match cli.command {
        Commands::Daemon => 1,
        _ => 0,
    };
    let level = match cli.verbose.saturating_add(base) {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout belongs to the picker.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose > 1)
        .init();
}

fn notifier(config: &Config) -> Box<dyn Notifier> {
    if config.settings.notify {
        Box::new(DesktopNotifier::new(APP_NAME))
    } else {
        Box::new(SilentNotifier)
    }
}

fn controller(config: &Config) -> Result<MenuController> {
    let backend = open_backend(config.settings.backend, &config.paths.data_dir)
        .with_context(|| format!("opening data dir {}", config.paths.data_dir.display()))?;
    Ok(MenuController::new(
        config,
        backend,
        Box::new(SystemClipboard::new()),
        notifier(config),
    )
    .with_handoff(&config.paths.socket))
}

fn show(config: &Config, mode: MenuMode) -> Result<()> {
    let rows = controller(config)?.show(mode);
    let markup = config.settings.markup_rows() && mode == MenuMode::Persistent;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_rows(&mut out, &rows, config.settings.row_index, markup).context("writing rows")?;
    out.flush().context("writing rows")
}

fn select(config: &Config, mode: MenuMode, selection: &Selection) -> Result<()> {
    let outcome = controller(config)?
        .select(mode, selection)
        .with_context(|| format!("selecting from {mode}"))?;
    match outcome {
        SelectOutcome::Copied { index, via_daemon, .. } => {
            info!(%mode, index, via_daemon, "entry copied");
        }
        SelectOutcome::ActionRan { name } => info!(action = %name, "action ran"),
        // Already notified; the picker still exits cleanly.
        SelectOutcome::ActionFailed { name, reason } => warn!(action = %name, %reason, "action failed"),
        SelectOutcome::Ignored => info!(%mode, "selection no longer matches a row"),
    }
    Ok(())
}

async fn run_daemon(config: Config) -> Result<()> {
    let listener = match HandoffListener::bind(&config.paths.socket) {
        Ok(listener) => Some(listener),
        Err(err @ HandoffError::AlreadyRunning(_)) => {
            return Err(err).context("refusing to start a second daemon");
        }
        Err(err) => {
            warn!(%err, "handoff socket unavailable, menus will set the clipboard themselves");
            None
        }
    };
    let backend = open_backend(config.settings.backend, &config.paths.data_dir)
        .with_context(|| format!("opening data dir {}", config.paths.data_dir.display()))?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.paths.data_dir.display(),
        backend = ?config.settings.backend,
        "starting clipboard daemon"
    );

    let watcher = Watcher::new(
        Box::new(SystemClipboard::new()),
        backend,
        notifier(&config),
        WatcherConfig::from_settings(&config.settings),
    );
    watcher.run(listener, shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(err) => {
                warn!(%err, "SIGTERM handler unavailable");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
