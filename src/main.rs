//! Gangway - progress and access-control core for the client portal
//!
//! The binary wires the engines to MongoDB and, when an organization is
//! given, dumps its dashboard and insights reports as JSON. The library
//! crate is the real surface; this entry point exists for operations and
//! smoke checks.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gangway::{
    activity::{ActivityLogger, Notifier, TracingNotifier},
    analytics::AnalyticsService,
    auth::{AccessGate, SessionSigner},
    config::Args,
    db::mongo::MongoClient,
    services::ActionService,
    GangwayError,
};

#[tokio::main]
async fn main() -> gangway::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gangway={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Gangway - client portal core");
    info!("======================================");
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Database: {}", args.mongodb_db);
    info!(
        "Mode: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
    );
    info!("======================================");

    // Connect to MongoDB
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            info!("MongoDB connected successfully");
            client
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    // Build the full service graph once so every collection's indexes are
    // applied at startup and a bad session secret fails fast.
    let secret = args
        .session_secret()
        .ok_or_else(|| GangwayError::Config("SESSION_SECRET is required".into()))?;
    let signer = SessionSigner::new(secret, args.session_expiry_seconds)?;
    let gate = AccessGate::new(&mongo, signer).await?;
    let notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(TracingNotifier)];
    let activity = ActivityLogger::new(&mongo, notifiers).await?;
    let _actions = ActionService::new(&mongo, gate, activity).await?;
    info!("Collections ready, indexes applied");

    let analytics = AnalyticsService::new(&mongo).await?;

    match &args.org_id {
        Some(org_id) => {
            info!("Generating reports for org {}", org_id);
            let dashboard = analytics.get_dashboard_stats(org_id).await?;
            let insights = analytics.get_insights_data(org_id).await?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            println!("{}", serde_json::to_string_pretty(&insights)?);
        }
        None => {
            info!("No --org-id given; connection check complete");
        }
    }

    Ok(())
}
