use serde::{Deserialize, Serialize};
use std::path::Path;
use zpl_util::UtxoRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    Deposit,
    Withdrawal,
}

/// Settlement step of a bridge interaction, as reported by the backend.
///
/// Deposits go to the hot reserve bucket first and are later locked into the
/// cold reserve; withdrawals are unlocked from the cold reserve to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionStatus {
    BitcoinDepositToHotReserve,
    VerifyDepositToHotReserveTransaction,
    SolanaDepositToHotReserve,
    AddLockToColdReserveProposal,
    BitcoinLockToColdReserve,
    VerifyLockToColdReserveTransaction,
    SolanaLockToColdReserve,

    AddWithdrawalRequest,
    AddUnlockToUserProposal,
    BitcoinUnlockToUser,
    VerifyUnlockToUserTransaction,
    SolanaUnlockToUser,
}

static DEPOSIT_PIPELINE: [InteractionStatus; 7] = [
    InteractionStatus::BitcoinDepositToHotReserve,
    InteractionStatus::VerifyDepositToHotReserveTransaction,
    InteractionStatus::SolanaDepositToHotReserve,
    InteractionStatus::AddLockToColdReserveProposal,
    InteractionStatus::BitcoinLockToColdReserve,
    InteractionStatus::VerifyLockToColdReserveTransaction,
    InteractionStatus::SolanaLockToColdReserve,
];

static WITHDRAWAL_PIPELINE: [InteractionStatus; 5] = [
    InteractionStatus::AddWithdrawalRequest,
    InteractionStatus::AddUnlockToUserProposal,
    InteractionStatus::BitcoinUnlockToUser,
    InteractionStatus::VerifyUnlockToUserTransaction,
    InteractionStatus::SolanaUnlockToUser,
];

impl InteractionType {
    pub fn pipeline(&self) -> &'static [InteractionStatus] {
        match self {
            InteractionType::Deposit => &DEPOSIT_PIPELINE,
            InteractionType::Withdrawal => &WITHDRAWAL_PIPELINE,
        }
    }
}

impl InteractionStatus {
    pub fn interaction_type(&self) -> InteractionType {
        if DEPOSIT_PIPELINE.contains(self) {
            InteractionType::Deposit
        } else {
            InteractionType::Withdrawal
        }
    }

    // 1-based
    pub fn step(&self) -> usize {
        let pipeline = self.interaction_type().pipeline();
        pipeline
            .iter()
            .position(|status| status == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn is_settled(&self) -> bool {
        self.interaction_type().pipeline().last() == Some(self)
    }

    pub fn is_in_flight(&self) -> bool {
        !self.is_settled()
    }
}

impl std::fmt::Display for InteractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub interaction_id: String,
    pub interaction_type: InteractionType,
    pub status: InteractionStatus,

    #[serde(default)]
    pub amount: u64,

    // Bitcoin transaction that paid into the hot reserve bucket
    #[serde(default)]
    pub deposit_transaction_id: Option<String>,

    #[serde(default)]
    pub deposit_utxos: Vec<UtxoRef>,

    #[serde(default)]
    pub initiated_at: u64,
}

impl Interaction {
    pub fn is_in_flight_deposit(&self) -> bool {
        if self.status.interaction_type() != self.interaction_type {
            warn!(
                "Interaction {} has type {:?} but status {}",
                self.interaction_id, self.interaction_type, self.status
            );
        }

        self.interaction_type == InteractionType::Deposit && self.status.is_in_flight()
    }

    pub fn committed_utxos(&self) -> &[UtxoRef] {
        if self.is_in_flight_deposit() {
            &self.deposit_utxos
        } else {
            &[]
        }
    }
}

pub fn load_interactions_from_file(path: &Path) -> Result<Vec<Interaction>, String> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        let msg = format!("Failed to read interactions file {}: {}", path.display(), e);
        error!("{}", msg);
        msg
    })?;

    let interactions: Vec<Interaction> = serde_json::from_str(&data).map_err(|e| {
        let msg = format!("Failed to parse interactions file {}: {}", path.display(), e);
        error!("{}", msg);
        msg
    })?;

    info!(
        "Loaded {} interactions from {}",
        interactions.len(),
        path.display()
    );
    Ok(interactions)
}
