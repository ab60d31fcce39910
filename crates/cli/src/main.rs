use anyhow::Context;
use clap::{Parser, Subcommand};
use gtb_core::config::Settings;
use gtb_core::dashboard::Dashboard;
use gtb_core::domain::growth::ContributionPlan;
use gtb_core::domain::portfolio::TICKERS;
use gtb_core::quotes::yahoo::HttpQuoteProvider;
use gtb_core::storage::file::FileStore;
use gtb_core::storage::preferences::EXPORT_FILE_NAME;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod view;

#[derive(Debug, Parser)]
#[command(name = "gtb", about = "Global Titan Blend Index (GTB) simulator")]
struct Args {
    /// Any non-empty value opens the gate.
    #[arg(long, env = "GTB_EMAIL", default_value = "")]
    email: String,

    /// Any non-empty value opens the gate.
    #[arg(long, env = "GTB_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Allocation, prices, income and the active growth curve.
    Dashboard,
    /// Fetch the price snapshot and the income estimate.
    Prices,
    /// Both projected growth curves.
    Growth,
    /// Sector allocation table.
    Allocation,
    /// Select and persist the monthly contribution (500 or 1000).
    Plan { amount: ContributionPlan },
    /// Write the preference object as JSON.
    Export {
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Replace the preference object from a JSON file.
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(&settings, args).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "gtb command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(settings: &Settings, args: Args) -> anyhow::Result<()> {
    let store_path = settings.store_path();
    let store = FileStore::open(&store_path)
        .with_context(|| format!("failed to open store {}", store_path.display()))?;
    let mut dashboard = Dashboard::open(store, settings.dividend_yield());

    if !dashboard.login(&args.email, &args.password)? {
        print!("{}", view::login_prompt());
        return Ok(());
    }

    match args.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            let provider = HttpQuoteProvider::from_settings(settings)?;
            dashboard.refresh_prices(&provider, &TICKERS).await;
            print!("{}", view::dashboard(&dashboard));
        }
        Command::Prices => {
            let provider = HttpQuoteProvider::from_settings(settings)?;
            dashboard.refresh_prices(&provider, &TICKERS).await;
            print!("{}", view::prices(&dashboard));
        }
        Command::Growth => print!("{}", view::growth_table(dashboard.active_plan())),
        Command::Allocation => print!("{}", view::allocation()),
        Command::Plan { amount } => {
            dashboard.select_plan(amount)?;
            println!("Contribution set to {amount}");
        }
        Command::Export { out } => {
            dashboard.export_to(&out)?;
            println!("Exported to {}", out.display());
        }
        Command::Import { path } => {
            dashboard.import_from(&path)?;
            let label = dashboard
                .preferences()
                .contribution_label()
                .unwrap_or("<none>");
            println!("Imported {} (contribution: {label})", path.display());
        }
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
