mod dashboard;
mod manual;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rxlocate-cli")]
#[command(about = "rxlocate maintenance and reporting commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Check database connectivity
    Ping,
    /// Print aggregated pharmacies and totals as JSON
    Dashboard {
        /// Inclusive lower bound on submission time (RFC 3339)
        #[arg(long, requires = "end")]
        start: Option<DateTime<Utc>>,
        /// Exclusive upper bound on submission time (RFC 3339)
        #[arg(long, requires = "start")]
        end: Option<DateTime<Utc>>,
    },
    /// List manually submitted pharmacies awaiting review
    Pending,
    /// Approve a manually submitted pharmacy so search shows it
    Approve {
        /// Generated pharmacy id (e.g. manual-0123456789abcdef)
        pharmacy_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rxlocate_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("rxlocate-cli: no command given, see --help");
        return Ok(());
    };

    let pool_config = rxlocate_db::PoolConfig::from_app_config(&config);
    let pool = rxlocate_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Migrate => {
            let applied = rxlocate_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Ping => {
            rxlocate_db::health_check(&pool).await?;
            println!("database ok");
        }
        Commands::Dashboard { start, end } => {
            let timeframe = start.zip(end);
            dashboard::run_dashboard(&pool, timeframe).await?;
        }
        Commands::Pending => manual::run_pending(&pool).await?,
        Commands::Approve { pharmacy_id } => manual::run_approve(&pool, &pharmacy_id).await?,
    }

    Ok(())
}
