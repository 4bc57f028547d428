use crate::types::Utxo;
use bitcoincore_rpc::bitcoin::Script;
use bitcoincore_rpc::bitcoin::address::{Address, NetworkChecked};
use electrum_client::{Client, ElectrumApi, ListUnspentRes};

pub struct ElectrsClient {
    client: Client,
}

impl ElectrsClient {
    pub fn new(server_url: &str) -> Result<Self, String> {
        let client = Client::new(server_url).map_err(|e| {
            let msg = format!("Failed to create Electrs client: {}", e);
            error!("{}", msg);
            msg
        })?;

        Ok(Self { client })
    }

    // Unspent outputs of an address, confirmed and mempool
    pub async fn list_unspent(&self, address: &Address<NetworkChecked>) -> Result<Vec<Utxo>, String> {
        let utxos = self.list_unspent_by_script(&address.script_pubkey()).await?;

        info!("Loaded {} UTXOs for address {}", utxos.len(), address);
        Ok(utxos)
    }

    pub async fn list_unspent_by_script(&self, script: &Script) -> Result<Vec<Utxo>, String> {
        let unspent = self.client.script_list_unspent(script).map_err(|e| {
            let msg = format!("Failed to list unspent for script {}: {}", script, e);
            error!("{}", msg);
            msg
        })?;

        Ok(unspent.iter().map(utxo_from_unspent).collect())
    }
}

// Electrum reports height 0 for mempool outputs.
pub fn utxo_from_unspent(item: &ListUnspentRes) -> Utxo {
    Utxo {
        transaction_id: item.tx_hash.to_string(),
        transaction_index: item.tx_pos as u32,
        satoshis: item.value,
        block_height: item.height as u64,
    }
}
