use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

mod api;
mod auth;
mod config;
mod db;
mod decode;
mod error;
mod lifecycle;
mod models;
mod progress;
mod report;
mod schedule;
#[cfg(test)]
mod testing;

use api::HttpPortalApi;
use config::PortalConfig;
use progress::ProgressReportView;
use schedule::ScheduleView;

#[derive(Parser)]
#[command(name = "student-portal")]
#[command(about = "Progress, schedule and admin checks for the student portal", long_about = None)]
struct Cli {
    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show attendance, coursework stats and recent feedback
    Progress {
        /// Subject user the token belongs to
        #[arg(long, default_value = "me")]
        user: String,
        #[arg(long)]
        json: bool,
    },
    /// Show upcoming published classes grouped by day
    Schedule {
        #[arg(long)]
        json: bool,
    },
    /// List admin-role users in the portal database
    VerifyAdmins,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "info" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Progress { user, json } => {
            let config = PortalConfig::from_env()?;
            let api = HttpPortalApi::new(&config.api_base)?;
            let mut view = ProgressReportView::default();
            view.activate(&api, &config.auth, &user).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
            } else {
                print!("{}", report::render_progress(&view));
            }
        }
        Commands::Schedule { json } => {
            let config = PortalConfig::from_env()?;
            let api = HttpPortalApi::new(&config.api_base)?;
            let mut view = ScheduleView::default();
            view.activate(&api, &config.auth).await;

            let state = view.state(Utc::now());
            if json {
                let value = match &state {
                    schedule::ScheduleState::Loading => serde_json::json!({ "loading": true }),
                    schedule::ScheduleState::Error(message) => {
                        serde_json::json!({ "error": message })
                    }
                    schedule::ScheduleState::Content(groups) => {
                        serde_json::json!({ "groups": groups })
                    }
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", report::render_schedule(&state));
            }
        }
        Commands::VerifyAdmins => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&database_url)
                .await
                .context("failed to connect to the portal database")?;

            let admins = db::fetch_admins(&pool)
                .await
                .context("failed to query admin users")?;
            print!("{}", report::render_admins(&admins));
            pool.close().await;
        }
    }

    Ok(())
}
