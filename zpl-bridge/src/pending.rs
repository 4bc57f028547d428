use crate::interaction::Interaction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use zpl_util::UtxoRef;

// A deposit broadcast by this client that the backend may not report yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeposit {
    pub transaction_id: String,
    pub utxos: Vec<UtxoRef>,
    pub amount: u64,
    pub created_at: u64,
}

pub struct PendingDepositCache {
    path: PathBuf,
    entries: Vec<PendingDeposit>,
}

impl PendingDepositCache {
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            info!(
                "Pending deposit cache {} does not exist, starting empty",
                path.display()
            );
            return Ok(Self {
                path: path.to_path_buf(),
                entries: Vec::new(),
            });
        }

        let data = std::fs::read_to_string(path).map_err(|e| {
            let msg = format!("Failed to read pending deposits {}: {}", path.display(), e);
            error!("{}", msg);
            msg
        })?;

        let entries: Vec<PendingDeposit> = serde_json::from_str(&data).map_err(|e| {
            let msg = format!("Failed to parse pending deposits {}: {}", path.display(), e);
            error!("{}", msg);
            msg
        })?;

        info!(
            "Loaded {} pending deposits from {}",
            entries.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn save(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                let msg = format!("Failed to create directory {}: {}", parent.display(), e);
                error!("{}", msg);
                msg
            })?;
        }

        let data = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            let msg = format!("Failed to serialize pending deposits: {}", e);
            error!("{}", msg);
            msg
        })?;

        // Replace the cache file atomically
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data).map_err(|e| {
            let msg = format!("Failed to write {}: {}", tmp_path.display(), e);
            error!("{}", msg);
            msg
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let msg = format!(
                "Failed to move {} to {}: {}",
                tmp_path.display(),
                self.path.display(),
                e
            );
            error!("{}", msg);
            msg
        })?;

        Ok(())
    }

    pub fn entries(&self) -> &[PendingDeposit] {
        &self.entries
    }

    // Replaces an entry with the same transaction id.
    pub fn add(&mut self, deposit: PendingDeposit) -> Result<(), String> {
        if deposit.utxos.is_empty() {
            let msg = format!(
                "Pending deposit {} must spend at least one UTXO",
                deposit.transaction_id
            );
            error!("{}", msg);
            return Err(msg);
        }

        self.entries
            .retain(|entry| entry.transaction_id != deposit.transaction_id);
        info!(
            "Caching pending deposit {} spending {} UTXOs",
            deposit.transaction_id,
            deposit.utxos.len()
        );
        self.entries.push(deposit);
        Ok(())
    }

    pub fn remove(&mut self, transaction_id: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.transaction_id != transaction_id);
        before != self.entries.len()
    }

    /// Drops deposits the backend now reports, and deposits older than `ttl_secs`.
    /// Returns the number of removed entries.
    pub fn prune(&mut self, interactions: &[Interaction], now: u64, ttl_secs: u64) -> usize {
        let known: HashSet<&str> = interactions
            .iter()
            .filter_map(|interaction| interaction.deposit_transaction_id.as_deref())
            .collect();

        let before = self.entries.len();
        self.entries.retain(|entry| {
            if known.contains(entry.transaction_id.as_str()) {
                debug!("Pending deposit {} is now indexed", entry.transaction_id);
                return false;
            }
            if now.saturating_sub(entry.created_at) > ttl_secs {
                warn!(
                    "Pending deposit {} expired after {} seconds",
                    entry.transaction_id, ttl_secs
                );
                return false;
            }
            true
        });

        before - self.entries.len()
    }
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
