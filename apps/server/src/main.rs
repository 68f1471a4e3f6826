use anyhow::Context;
use charachat::domain::config::{ApiConfig, LogConfig};
use charachat::kernel::config::load_config;
use charachat_logger::Logger;
use charachat_server::Server;

fn init_logger(log: &LogConfig) -> anyhow::Result<Logger> {
    let mut builder =
        Logger::builder().name(env!("CARGO_PKG_NAME")).level_str(&log.level)?.json(log.json);
    if let Some(filter) = &log.filter {
        builder = builder.env_filter(filter.clone());
    }

    let logger = match &log.dir {
        Some(dir) => builder.path(dir.clone()).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

#[charachat_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "server".to_owned());
    let cfg: ApiConfig = load_config(Some(&path)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.log)?;
    tracing::info!(config = %path, "Configuration loaded");

    Server::builder().config(cfg).build().await?.run().await
}
