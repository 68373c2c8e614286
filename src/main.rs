use std::error::Error;

use tracing::{error, info};

use sso_auth::app::App;
use sso_auth::config::Settings;
use sso_auth::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize logging
    telemetry::init(settings.env)?;

    info!(env = ?settings.env, "starting sso auth service");

    let app = App::new(settings).map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    if let Err(e) = app.run(shutdown_signal()).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

// Signal handling for graceful shutdown
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
