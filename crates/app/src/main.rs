//! Hotelier command line: serve the store or query it

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use hotelier_app::screens::EstablishmentsScreen;
use hotelier_app::{
    AppConfig, AppError, HotelApi, LocalApi, RemoteApi, Result, ScreenContext, TracingNotifier,
};
use hotelier_core::Database;
use hotelier_net::Server;

#[derive(Parser)]
#[command(name = "hotelier", version, about = "Hotel back-office")]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the local database to remote back-offices
    Serve {
        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// List establishments with portfolio counts
    Summary,
    /// Room figures for one establishment
    Stats { establishment: Uuid },
    /// Write the current configuration to disk
    InitConfig,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        tracing::error!("{}", e);
        eprintln!("hotelier: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load(&config_path)?;

    match cli.command {
        Command::Serve { port } => serve(&config, port).await,
        Command::InitConfig => {
            config.save(&config_path)?;
            println!("Configuration written to {}", config_path.display());
            Ok(())
        }
        command => match config.remote {
            Some(addr) => {
                tracing::info!(%addr, "Using remote store");
                query(RemoteApi::connect(addr).await?, command).await
            }
            None => {
                let db = Database::open(&config.database_path()?)?;
                query(LocalApi::new(db), command).await
            }
        },
    }
}

async fn serve(config: &AppConfig, port: Option<u16>) -> Result<()> {
    let path = config.database_path()?;
    let db = Database::open(&path)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));

    let server = Server::start(addr, db).await?;
    tracing::info!(addr = %server.addr(), db = %path.display(), "Store server running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown();
    Ok(())
}

async fn query<A: HotelApi>(api: A, command: Command) -> Result<()> {
    let ctx = ScreenContext::new(api, Arc::new(TracingNotifier));

    match command {
        Command::Summary => {
            let mut screen = EstablishmentsScreen::new(ctx);
            screen.load().await;
            for hotel in screen.visible() {
                let d = &hotel.details;
                println!(
                    "{}  {:<30} {:<20} {:>3}%  {}",
                    hotel.id,
                    d.name,
                    d.city,
                    d.occupancy_rate(),
                    d.status.as_str()
                );
            }
            println!("{}", screen.summary());
            if let Some(summary) = screen.overview().await {
                println!(
                    "{} of {} active, {} rooms, {}% occupied",
                    summary.active,
                    summary.establishments,
                    summary.total_rooms,
                    summary.occupancy_rate
                );
            }
            Ok(())
        }
        Command::Stats { establishment } => {
            let stats = ctx.api().room_statistics(establishment).await?;
            println!(
                "{} rooms: {} available, {} occupied, {} in maintenance",
                stats.total_rooms,
                stats.available_rooms,
                stats.occupied_rooms,
                stats.maintenance_rooms
            );
            println!(
                "Occupancy {}%, average price {:.2}, potential revenue {:.2}",
                stats.occupancy_rate, stats.average_price, stats.potential_revenue
            );
            Ok(())
        }
        Command::Serve { .. } | Command::InitConfig => Err(AppError::InvalidArgument(
            "command does not query the store".to_string(),
        )),
    }
}
