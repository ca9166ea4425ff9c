mod api;
mod desk;
mod error;
mod modes;
mod store;
mod triage;

use anyhow::Result;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    modes::run_from_env().await
}
