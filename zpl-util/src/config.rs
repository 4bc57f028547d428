use bitcoincore_rpc::bitcoin::Network;
use serde::{Deserialize, Serialize};

fn default_network() -> Network {
    Network::Bitcoin
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BTCConfig {
    #[serde(default = "default_network")]
    pub network: Network,
}

impl BTCConfig {
    pub fn network(&self) -> Network {
        self.network
    }
}

impl Default for BTCConfig {
    fn default() -> Self {
        BTCConfig {
            network: default_network(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectrsConfig {
    #[serde(default = "default_electrs_rpc_url")]
    pub rpc_url: String,
}

fn default_electrs_rpc_url() -> String {
    "tcp://127.0.0.1:50001".to_string()
}

impl ElectrsConfig {
    pub fn rpc_url(&self) -> &str {
        self.rpc_url.as_str()
    }
}

impl Default for ElectrsConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_electrs_rpc_url(),
        }
    }
}

// Binance compatible ticker API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    #[serde(default = "default_price_api_url")]
    pub api_url: String,
}

fn default_price_api_url() -> String {
    "https://api.binance.com/api".to_string()
}

impl PriceConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            api_url: default_price_api_url(),
        }
    }
}
