mod replay;
mod serve;
mod shared;

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Serve,
    Replay,
}

impl RunMode {
    fn from_env() -> Self {
        let raw = std::env::var("RUN_MODE").unwrap_or_else(|_| "serve".into());
        match raw.trim().to_lowercase().as_str() {
            "replay" => Self::Replay,
            _ => Self::Serve,
        }
    }
}

pub async fn run_from_env() -> Result<()> {
    match RunMode::from_env() {
        RunMode::Serve => serve::run().await,
        RunMode::Replay => replay::run().await,
    }
}
