//! CLI configuration loader and runtime settings.
//!
//! ```toml
//! default_network = "rinkeby"
//!
//! [defaults]
//! preset = "usa-federal-government"
//!
//! [networks.local]
//! rpc_url = "http://127.0.0.1:8545"
//!
//! [networks.rinkeby]
//! rpc_url = "http://127.0.0.1:8546"
//! from = "0x27644a3F5D51dEA8705DC7FB1CD67100D73273B1"
//! gas_price = "60000000001"
//! receipt_timeout_secs = 900
//! ```

use crate::error::{CliError, CliResult};
use lib_abi::{Address, Uint256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default CLI config filename under ~/.liquid/
pub const DEFAULT_CONFIG_FILENAME: &str = "cli.toml";

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    pub default_network: Option<String>,
    pub defaults: Option<CliDefaults>,
    #[serde(default)]
    pub networks: HashMap<String, NetworkProfile>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CliDefaults {
    /// Template address used when `deploy-dao` gets none
    pub template: Option<String>,
    pub plan: Option<String>,
    pub preset: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct NetworkProfile {
    pub rpc_url: String,
    pub from: Option<String>,
    /// Wei per gas, decimal or scientific (`"60e9"`)
    pub gas_price: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub receipt_timeout_secs: Option<u64>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub rpc: Option<String>,
    pub network: Option<String>,
    pub from: Option<String>,
    pub gas_price: Option<String>,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub rpc_url: String,
    pub network: Option<String>,
    pub from: Option<Address>,
    pub gas_price: Option<Uint256>,
    pub poll_interval: Duration,
    pub receipt_timeout: Duration,
    pub template: Option<Address>,
    pub plan: Option<PathBuf>,
    pub preset: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".liquid").join(DEFAULT_CONFIG_FILENAME)
    } else {
        PathBuf::from("./liquid-cli.toml")
    }
}

pub fn config_path(path: Option<&str>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the config file. A missing default file is an empty config; a
/// missing file that was asked for explicitly is an error.
pub fn load_config(path: Option<&str>) -> CliResult<CliConfig> {
    let config_path = config_path(path);

    if !config_path.exists() {
        if path.is_some() {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }
        return Ok(CliConfig::default());
    }

    let config = read_config(&config_path)?;
    debug!(
        "Loaded {} network profile(s) from {}",
        config.networks.len(),
        config_path.display()
    );
    Ok(config)
}

fn read_config(path: &Path) -> CliResult<CliConfig> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    toml::from_str(&raw).map_err(|e| CliError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_address(label: &str, raw: &str) -> CliResult<Address> {
    raw.parse()
        .map_err(|e| CliError::InvalidArgument(format!("{} '{}': {}", label, raw, e)))
}

fn parse_gas_price(raw: &str) -> CliResult<Uint256> {
    Uint256::parse_amount(raw)
        .map_err(|e| CliError::InvalidArgument(format!("gas price '{}': {}", raw, e)))
}

/// Merge overrides, the selected network profile and file defaults.
///
/// # Rules
///
/// - Command line and environment beat the network profile
/// - The network is `--network`, else `default_network`, else none
/// - Naming a network the file does not define is an error
/// - Without any RPC URL the local node default is used
pub fn resolve_settings(config: &CliConfig, overrides: &SettingsOverrides) -> CliResult<RuntimeSettings> {
    let network = overrides
        .network
        .clone()
        .or_else(|| config.default_network.clone());

    let profile = match &network {
        Some(name) => Some(
            config
                .networks
                .get(name)
                .ok_or_else(|| CliError::UnknownNetwork(name.clone()))?,
        ),
        None => None,
    };

    let rpc_url = overrides
        .rpc
        .clone()
        .or_else(|| profile.map(|p| p.rpc_url.clone()))
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

    let from = overrides
        .from
        .as_deref()
        .or_else(|| profile.and_then(|p| p.from.as_deref()))
        .map(|raw| parse_address("sender", raw))
        .transpose()?;

    let gas_price = overrides
        .gas_price
        .as_deref()
        .or_else(|| profile.and_then(|p| p.gas_price.as_deref()))
        .map(parse_gas_price)
        .transpose()?;

    let poll_interval_ms = profile
        .and_then(|p| p.poll_interval_ms)
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    let receipt_timeout_secs = profile
        .and_then(|p| p.receipt_timeout_secs)
        .unwrap_or(DEFAULT_RECEIPT_TIMEOUT_SECS);

    let defaults = config.defaults.clone().unwrap_or_default();
    let template = defaults
        .template
        .as_deref()
        .map(|raw| parse_address("template", raw))
        .transpose()?;

    Ok(RuntimeSettings {
        rpc_url,
        network,
        from,
        gas_price,
        poll_interval: Duration::from_millis(poll_interval_ms),
        receipt_timeout: Duration::from_secs(receipt_timeout_secs),
        template,
        plan: defaults.plan.map(PathBuf::from),
        preset: defaults.preset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
default_network = "rinkeby"

[defaults]
template = "0x5d94e3e7aec542ab0f9129b9a7badeb5b3ca0f77"
preset = "usa-federal-government"

[networks.local]
rpc_url = "http://127.0.0.1:8545"

[networks.rinkeby]
rpc_url = "http://127.0.0.1:8546"
from = "0x27644a3F5D51dEA8705DC7FB1CD67100D73273B1"
gas_price = "60000000001"
receipt_timeout_secs = 900
"#;

    fn config() -> CliConfig {
        toml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_default_network_profile_applies() {
        let settings = resolve_settings(&config(), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.rpc_url, "http://127.0.0.1:8546");
        assert_eq!(settings.network.as_deref(), Some("rinkeby"));
        assert_eq!(settings.gas_price, Some(Uint256::from_u64(60_000_000_001)));
        assert_eq!(settings.receipt_timeout, Duration::from_secs(900));
        assert_eq!(settings.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        assert_eq!(settings.preset.as_deref(), Some("usa-federal-government"));
        assert!(settings.template.is_some());
    }

    #[test]
    fn test_overrides_beat_profile() {
        let overrides = SettingsOverrides {
            rpc: Some("http://node:8545".to_string()),
            network: Some("rinkeby".to_string()),
            from: None,
            gas_price: Some("1e9".to_string()),
        };
        let settings = resolve_settings(&config(), &overrides).unwrap();
        assert_eq!(settings.rpc_url, "http://node:8545");
        assert_eq!(settings.gas_price, Some(Uint256::from_u64(1_000_000_000)));
        assert!(settings.from.is_some());
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        let overrides = SettingsOverrides {
            network: Some("mainnet".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_settings(&config(), &overrides),
            Err(CliError::UnknownNetwork(name)) if name == "mainnet"
        ));
    }

    #[test]
    fn test_empty_config_uses_local_node() {
        let settings = resolve_settings(&CliConfig::default(), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(settings.from, None);
        assert_eq!(settings.gas_price, None);
    }

    #[test]
    fn test_invalid_sender_is_reported() {
        let overrides = SettingsOverrides {
            from: Some("0x1234".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_settings(&CliConfig::default(), &overrides),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli.toml");
        fs::write(&path, CONFIG).unwrap();

        let loaded = load_config(path.to_str()).unwrap();
        assert_eq!(loaded.networks.len(), 2);
        assert_eq!(loaded.default_network.as_deref(), Some("rinkeby"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            load_config(path.to_str()),
            Err(CliError::ConfigError(_))
        ));
    }
}
