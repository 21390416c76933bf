//! Settings shared by the gwscan binaries.
//!
//! ### Configuration
//!
//! Settings are read from config files and then from the environment.
//!
//! #### N.B.: Environment variable names correspond 1:1 with the JSON object hierarchy.
//!
//! Any environment variable prefixed with
//!
//! * `GWSCAN_BASE`
//!
//! * `GWSCAN_[appname]`, e.g. `GWSCAN_CLI`
//!
//! is read as an override against the JSON config. `_` separates the levels
//! of the hierarchy, so key components are matched case and separator
//! insensitively: `GWSCAN_BASE_CHAIN_NATIVETOKEN_SYMBOL=CKB` overrides
//! `chain.nativeToken.symbol`.
//!
//! ### Configuration value precedence
//!
//! Later sources take precedence:
//!
//! 1. The files matching `./config/*.json`, when that directory exists.
//! 2. The files listed in `CONFIG_FILES`, comma separated, in order.
//! 3. Env vars prefixed `GWSCAN_BASE`.
//! 4. Env vars prefixed `GWSCAN_[appname]`.

use std::collections::HashMap;
use std::env;

use eyre::Result;
use gwscan_core::config::*;
use gwscan_core::pagination::PaginationRules;
use serde::Deserialize;

pub use chain::*;
pub use trace::*;

/// Chain and endpoint configuration
mod chain;
pub(crate) mod loader;
/// Tracing subscriber management
mod trace;

/// Settings of a gwscan binary.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// The chain being explored
    pub chain: ChainConf,
    /// Numeric pagination limits
    pub pagination: PaginationRules,
    /// The tracing configuration
    pub tracing: TracingConfig,
}

impl Settings {
    /// Load settings for the app named `app` from the config files and the
    /// process environment.
    pub fn load(app: &str) -> Result<Self> {
        let env: HashMap<String, String> = env::vars().collect();
        loader::load_settings_object(app, "./config", &env)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) struct RawSettings {
    #[serde(default)]
    chain: RawChainConf,
    #[serde(default)]
    pagination: RawPaginationConf,
    #[serde(default)]
    log: RawLogConf,
}

impl FromRawConf<'_, RawSettings> for Settings {
    fn from_config(raw: RawSettings, cwp: &ConfigPath) -> ConfigResult<Self> {
        let mut err = ConfigParsingError::default();

        let chain = raw
            .chain
            .parse_config(&cwp.join("chain"))
            .take_config_err(&mut err);
        let pagination = raw
            .pagination
            .parse_config(&cwp.join("pagination"))
            .take_config_err(&mut err);
        let tracing = raw
            .log
            .parse_config(&cwp.join("log"))
            .take_config_err(&mut err);

        err.into_result()?;
        Ok(Self {
            chain: chain.unwrap_or_default(),
            pagination: pagination.unwrap_or_default(),
            tracing: tracing.unwrap_or_default(),
        })
    }
}
