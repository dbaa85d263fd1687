// ABOUTME: Stride API server binary
// ABOUTME: Loads configuration, initializes logging and the database, then serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stride Server Binary
//!
//! Starts the REST API. Settings come from the environment (and `.env`);
//! the flags below override individual values.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use stride_server::{
    config::{DatabaseUrl, ServerConfig},
    logging,
    resources::ServerResources,
    server::StrideServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stride-server")]
#[command(about = "Stride - running training API with VDOT scoring, workouts and weekly plans")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (`sqlite:path` or `sqlite::memory:`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&database_url);
    }

    logging::init_from_env()?;

    info!("Starting Stride API");
    info!("{}", config.summary());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!(
        "Database ready: {}",
        resources.config.database.url.to_connection_string()
    );

    display_available_endpoints(port);

    if let Err(e) = StrideServer::new(resources).run(port).await {
        error!("Server error: {e}");
        return Err(e.into());
    }
    Ok(())
}

fn display_available_endpoints(port: u16) {
    info!("Available endpoints on port {port}:");
    info!("  GET    /health, /ready");
    info!("  POST   /api/auth/signup, /api/auth/signin");
    info!("  GET    /api/auth/signout");
    info!("  GET    /api/user, /api/user/:id");
    info!("  PUT    /api/user/:id, /api/user/pb/:id, /api/user/vdot/:id");
    info!("  POST   /api/fitness/vdot");
    info!("  GET    /api/fitness/paces, /api/fitness/predictions");
    info!("  POST   /api/training/workout, /api/training/plan");
    info!("  GET    /api/training/workouts/:user, /api/training/plans/:user");
    info!("  *      /api/training/workout/:id/:user, /api/training/plan/:id/:user");
    info!("  PUT    /api/training/plan/complete/:user");
}
