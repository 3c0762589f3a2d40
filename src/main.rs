use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use pmf_upgrade::api::{AdminApiTrait, AdminClient, FaqStore};
use pmf_upgrade::app::App;
use pmf_upgrade::config::Settings;
use pmf_upgrade::import::{self, FaqImport};
use pmf_upgrade::logging;
use pmf_upgrade::simulated::SimulatedApi;
use pmf_upgrade::ui::run_app;

fn cli() -> Command {
    Command::new("pmf-upgrade")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal client for the phpMyFAQ admin update wizard, FAQ overview and CSV import")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Settings file (defaults to ./pmf-upgrade.toml when present)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Admin base URL, e.g. https://faq.example.com/admin/"),
        )
        .arg(
            Arg::new("environment")
                .long("environment")
                .value_name("LABEL")
                .help("Release environment of the installation (production, nightly, ...)"),
        )
        .arg(
            Arg::new("csrf-token")
                .long("csrf-token")
                .value_name("TOKEN")
                .global(true)
                .help("CSRF token sent with FAQ status and delete requests"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .global(true)
                .help("Run against a simulated backend (nothing is changed)")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import FAQs from a CSV file")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .help("CSV file with one FAQ per line"),
                )
                .arg(
                    Arg::new("validate-only")
                        .long("validate-only")
                        .help("Only check the file, do not import anything")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

fn load_settings(matches: &ArgMatches) -> Result<Settings> {
    let config = matches.get_one::<String>("config").map(PathBuf::from);
    let mut settings = Settings::load(config.as_deref())?;

    if let Some(url) = matches.get_one::<String>("base-url") {
        settings.base_url = url.clone();
    }
    if let Some(environment) = matches.get_one::<String>("environment") {
        settings.release_environment = environment.clone();
    }
    if let Some(token) = matches.get_one::<String>("csrf-token") {
        settings.csrf_token = Some(token.clone());
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let settings = load_settings(&matches)?;
    let dry_run_mode = matches.get_flag("dry-run");

    match matches.subcommand() {
        Some(("import", sub)) => {
            logging::init_stderr()?;
            let file = sub
                .get_one::<String>("file")
                .map(PathBuf::from)
                .context("Missing CSV file")?;
            let validate_only = sub.get_flag("validate-only");

            if dry_run_mode {
                run_import(SimulatedApi::default(), &file, validate_only).await
            } else {
                run_import(AdminClient::new(&settings)?, &file, validate_only).await
            }
        }
        _ => {
            logging::init_file(&settings.log_path())?;
            info!(dry_run = dry_run_mode, base_url = %settings.base_url, "starting");

            let api: Box<dyn AdminApiTrait> = if dry_run_mode {
                Box::new(SimulatedApi::default())
            } else {
                Box::new(AdminClient::new(&settings)?)
            };
            run_tui_app(App::new(api, settings, dry_run_mode)).await
        }
    }
}

async fn run_import<S: FaqStore>(store: S, file: &Path, validate_only: bool) -> Result<()> {
    if !import::is_csv_file(file) {
        bail!("{} is not a .csv file", file.display());
    }
    let reader = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let rows = import::parse_csv(reader).with_context(|| format!("Failed to read {}", file.display()))?;

    if !import::validate_csv(&rows) {
        bail!(
            "{} is not a valid FAQ import file: every line needs {} fields and true/false flags",
            file.display(),
            import::RECORD_FIELDS
        );
    }
    if validate_only {
        println!("{}: {} records are valid", file.display(), rows.len());
        return Ok(());
    }

    let Some(summary) = FaqImport::new(store).import_all(&rows).await else {
        bail!("{} failed validation", file.display());
    };

    println!("Imported {} of {} FAQs", summary.imported.len(), rows.len());
    for (line, e) in &summary.failed {
        error!(line, "{e}");
        println!("  line {line}: {e}");
    }
    if !summary.is_clean() {
        bail!("{} records could not be imported", summary.failed.len());
    }
    Ok(())
}

async fn run_tui_app(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}
