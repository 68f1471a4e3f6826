use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `CHARACHAT__RECORDS__HEAL_ON_READ=false`.
pub const ENV_PREFIX: &str = "CHARACHAT";

/// Custom error type for config loading.
#[charachat_derive::charachat_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration tree from a file, overlaid with environment variables.
///
/// 1. **Base File**: `path` (any format the `config` crate detects by extension); defaults
///    to `server` in the working directory. The file is required.
/// 2. **Environment Overrides**: variables prefixed with `CHARACHAT__`. Nested keys use
///    double underscores (`CHARACHAT__DATABASE__URL` maps to `database.url`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or the merged tree does not
/// match `T`.
///
/// # Example
/// ```rust
/// use charachat_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    info!(path = %effective_path.display(), "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
