//! Shared startup used by every command that talks to QuickStats.
//!
//! Config -> directories -> client, done once per run. The handlers in `app`
//! then only deal with their own command.

use crate::config::Config;
use crate::data::quickstats::QuickStatsClient;
use crate::data::transport::{HttpTransport, Transport};
use crate::error::AppError;

/// Configuration plus a ready client.
pub struct Session<T: Transport = HttpTransport> {
    pub config: Config,
    pub client: QuickStatsClient<T>,
}

impl Session<HttpTransport> {
    /// Load config from the environment and prepare the output directories.
    pub fn start() -> Result<Self, AppError> {
        let config = load_config()?;
        let client = QuickStatsClient::from_config(&config);
        Ok(Self { config, client })
    }
}

impl<T: Transport> Session<T> {
    pub fn with_transport(config: Config, transport: T) -> Result<Self, AppError> {
        config.dirs.ensure()?;
        let client = QuickStatsClient::with_transport(&config, transport);
        Ok(Self { config, client })
    }
}

/// Config from the environment with directories created.
pub fn load_config() -> Result<Config, AppError> {
    let config = Config::from_env()?;
    config.dirs.ensure()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
