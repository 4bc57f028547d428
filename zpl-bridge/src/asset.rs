use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Every asset is minted as zBTC on Solana.
pub const Z_ASSET_NAME: &str = "zBTC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    #[default]
    Btc,
    Doge,
    Ltc,
}

impl Asset {
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Doge => "DOGE",
            Asset::Ltc => "LTC",
        }
    }

    pub fn decimals(&self) -> u32 {
        8
    }

    pub fn z_asset_name(&self) -> &'static str {
        Z_ASSET_NAME
    }

    pub fn ticker_symbol(&self) -> String {
        format!("{}USDT", self.symbol())
    }

    // UTXOs of other assets are read from a file and their full sum is spendable.
    pub fn has_indexer(&self) -> bool {
        matches!(self, Asset::Btc)
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BTC" => Ok(Asset::Btc),
            "DOGE" => Ok(Asset::Doge),
            "LTC" => Ok(Asset::Ltc),
            _ => Err(format!("Unsupported asset: {}", s)),
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
