use course_catalog_migrator::config::MigrationConfig;
use course_catalog_migrator::error::MigrationError;
use course_catalog_migrator::services::migration_runner::MigrationRunner;
use std::process;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("Migration aborted: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), MigrationError> {
    let config = MigrationConfig::from_env()?;
    log::info!("Migrating {} into {}", config.csv_path, config.base_url);

    let runner = MigrationRunner::new(config);
    runner.run().await?;
    Ok(())
}
