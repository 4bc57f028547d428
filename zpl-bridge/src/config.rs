use crate::fee::DEFAULT_HOT_RESERVE_MERKLE_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zpl_util::{
    BTCConfig, CONFIG_FILE_NAME, DEFAULT_FEE_RATE_SAT_PER_VB, DEFAULT_MIN_AMOUNT_SATS,
    DEFAULT_PENDING_TTL_SECS, DEFAULT_SERVICE_FEE_BPS, ElectrsConfig, PriceConfig,
};

fn default_fee_rate() -> u64 {
    DEFAULT_FEE_RATE_SAT_PER_VB
}

fn default_service_fee_bps() -> u64 {
    DEFAULT_SERVICE_FEE_BPS
}

fn default_min_amount() -> u64 {
    DEFAULT_MIN_AMOUNT_SATS
}

fn default_hot_reserve_merkle_depth() -> u8 {
    DEFAULT_HOT_RESERVE_MERKLE_DEPTH
}

fn default_pending_ttl_secs() -> u64 {
    DEFAULT_PENDING_TTL_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeConfig {
    // sat/vB
    #[serde(default = "default_fee_rate")]
    pub fee_rate: u64,

    // Charged on withdrawals, in basis points of the amount
    #[serde(default = "default_service_fee_bps")]
    pub service_fee_bps: u64,

    // Smallest deposit or withdrawal, in satoshis
    #[serde(default = "default_min_amount")]
    pub min_amount: u64,

    #[serde(default = "default_hot_reserve_merkle_depth")]
    pub hot_reserve_merkle_depth: u8,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
            service_fee_bps: default_service_fee_bps(),
            min_amount: default_min_amount(),
            hot_reserve_merkle_depth: default_hot_reserve_merkle_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_pending_ttl_secs")]
    pub pending_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pending_ttl_secs: default_pending_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub btc: BTCConfig,
    #[serde(default)]
    pub electrs: ElectrsConfig,
    #[serde(default)]
    pub price: PriceConfig,
    #[serde(default)]
    pub fee: FeeConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl BridgeConfig {
    pub fn load(root_dir: &Path) -> Result<Self, String> {
        let path = root_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let default_config = BridgeConfig::default();
            info!(
                "Config file {} does not exist. Using default configuration.",
                path.display()
            );
            match toml::to_string_pretty(&default_config) {
                Ok(s) => info!("Default config: {}", s),
                Err(e) => warn!("Failed to render default config: {}", e),
            }
            Ok(default_config)
        } else {
            info!("Loading config from {}", path.display());
            let config_data = std::fs::read_to_string(&path).map_err(|e| {
                let msg = format!("Failed to read config file {}: {}", path.display(), e);
                error!("{}", msg);
                msg
            })?;
            debug!("Config data: {}", config_data);

            let config: BridgeConfig = toml::from_str(&config_data).map_err(|e| {
                let msg = format!("Failed to parse config file {}: {}", path.display(), e);
                error!("{}", msg);
                msg
            })?;

            Ok(config)
        }
    }
}
