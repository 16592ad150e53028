use dotenvy::dotenv;
use order_desk::{
    config::{self, database},
    core::user,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Connect to the store and make sure the tables exist
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the bootstrap administrator (if configured and missing)
    if let Some(seed) = &app_config.bootstrap_admin {
        let created = user::seed_bootstrap_admin(&db, seed)
            .await
            .inspect_err(|e| error!("Failed to seed bootstrap administrator: {}", e))?;
        if created {
            info!("Bootstrap administrator {} created.", seed.email);
        }
    }

    info!("Order desk store ready at {}.", app_config.database_url);

    db.close().await?;
    Ok(())
}
