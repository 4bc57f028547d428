use crate::interaction::Interaction;
use crate::pending::PendingDeposit;
use std::collections::{BTreeSet, HashSet};
use zpl_util::{Utxo, UtxoRef};

pub fn total_satoshis(utxos: &[Utxo]) -> u64 {
    utxos
        .iter()
        .fold(0u64, |acc, utxo| acc.saturating_add(utxo.satoshis))
}

// Wallet UTXOs split by whether an in-flight deposit already spends them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoPartition {
    pub available: Vec<Utxo>,
    pub unavailable: Vec<Utxo>,
}

impl UtxoPartition {
    pub fn total_satoshis(&self) -> u64 {
        self.available_satoshis()
            .saturating_add(self.unavailable_satoshis())
    }

    pub fn available_satoshis(&self) -> u64 {
        total_satoshis(&self.available)
    }

    pub fn unavailable_satoshis(&self) -> u64 {
        total_satoshis(&self.unavailable)
    }
}

// Order of `utxos` is kept in both halves.
pub fn partition_utxos(utxos: &[Utxo], committed: &[UtxoRef]) -> UtxoPartition {
    let committed: HashSet<&UtxoRef> = committed.iter().collect();

    let (unavailable, available): (Vec<Utxo>, Vec<Utxo>) = utxos
        .iter()
        .cloned()
        .partition(|utxo| committed.contains(&utxo.utxo_ref()));

    debug!(
        "Partitioned {} UTXOs: {} available, {} unavailable",
        utxos.len(),
        available.len(),
        unavailable.len()
    );

    UtxoPartition {
        available,
        unavailable,
    }
}

// Outputs spent by deposits the backend reports in flight, plus deposits
// this client broadcast that the backend has not picked up yet.
pub fn committed_utxos(interactions: &[Interaction], pending: &[PendingDeposit]) -> Vec<UtxoRef> {
    let mut refs = BTreeSet::new();
    for interaction in interactions {
        refs.extend(interaction.committed_utxos().iter().cloned());
    }
    for deposit in pending {
        refs.extend(deposit.utxos.iter().cloned());
    }

    refs.into_iter().collect()
}
