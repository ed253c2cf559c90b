//! Fintera server entry point.

use fintera::config::AppConfig;
use fintera::db::Database;
use fintera::{gateway, logging};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--env" && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);

    // Guard must live for the whole process or buffered logs are lost.
    let _guard = logging::init_logging(&config);
    tracing::info!(
        "starting fintera {} ({}) env={env}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let db = Database::connect(&config.postgres_url).await?;
    db.migrate().await?;
    tracing::info!("database migrations applied");

    gateway::run_server(config, db).await
}
