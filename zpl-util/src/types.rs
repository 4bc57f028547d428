use serde::{Deserialize, Serialize};

// Unspent output as reported by the bridge indexer. Field names follow the
// indexer's JSON so lists can be read straight from its responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub transaction_id: String,
    pub transaction_index: u32,
    pub satoshis: u64,
    #[serde(default)]
    pub block_height: u64,
}

impl Utxo {
    pub fn utxo_ref(&self) -> UtxoRef {
        UtxoRef {
            transaction_id: self.transaction_id.clone(),
            transaction_index: self.transaction_index,
        }
    }
}

// Identity of an output, without its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoRef {
    pub transaction_id: String,
    pub transaction_index: u32,
}

impl std::fmt::Display for UtxoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.transaction_index)
    }
}

// Parses `txid:vout`
impl std::str::FromStr for UtxoRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, index) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("Invalid output reference {}, expected txid:vout", s))?;
        if txid.is_empty() {
            return Err(format!("Invalid output reference {}, empty txid", s));
        }

        let transaction_index = index
            .parse::<u32>()
            .map_err(|e| format!("Invalid output index in {}: {}", s, e))?;

        Ok(Self {
            transaction_id: txid.to_string(),
            transaction_index,
        })
    }
}

pub fn load_utxos_from_file(path: &std::path::Path) -> Result<Vec<Utxo>, String> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        let msg = format!("Failed to read UTXO file {}: {}", path.display(), e);
        error!("{}", msg);
        msg
    })?;

    serde_json::from_str(&data).map_err(|e| {
        let msg = format!("Failed to parse UTXO file {}: {}", path.display(), e);
        error!("{}", msg);
        msg
    })
}
