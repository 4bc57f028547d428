use crate::amount::check_amount_range;
use crate::asset::Asset;
use crate::config::FeeConfig;
use crate::fee::{estimate_max_spendable_amount, estimated_lock_to_cold_transaction_fee};
use crate::utxo::total_satoshis;
use zpl_util::Utxo;

pub fn max_spendable_amount(asset: Asset, available: &[Utxo], fee_rate: u64) -> u64 {
    if asset.has_indexer() {
        estimate_max_spendable_amount(available, fee_rate)
    } else {
        total_satoshis(available)
    }
}

/// What a deposit of `amount` into the hot reserve bucket mints on Solana.
///
/// The lock-to-cold miner fee is charged on the minted amount, the user's own
/// deposit transaction fee is accounted for in `max_spendable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositQuote {
    pub asset: Asset,
    pub amount: u64,
    pub max_spendable: u64,
    pub miner_fee: u64,
    pub received: u64,
    pub is_deposit_all: bool,
}

impl DepositQuote {
    pub fn new(
        asset: Asset,
        amount: u64,
        available: &[Utxo],
        fee: &FeeConfig,
    ) -> Result<Self, String> {
        let max_spendable = max_spendable_amount(asset, available, fee.fee_rate);
        check_amount_range(amount, fee.min_amount, max_spendable, asset.decimals()).map_err(
            |msg| {
                warn!("Rejected {} deposit: {}", asset, msg);
                msg
            },
        )?;

        let miner_fee =
            estimated_lock_to_cold_transaction_fee(fee.fee_rate, fee.hot_reserve_merkle_depth);
        let quote = Self {
            asset,
            amount,
            max_spendable,
            miner_fee,
            received: amount.saturating_sub(miner_fee),
            is_deposit_all: amount == max_spendable,
        };

        debug!("Deposit quote: {:?}", quote);
        Ok(quote)
    }
}
