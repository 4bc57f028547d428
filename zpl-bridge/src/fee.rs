//! Fee estimation for the Taproot transactions the bridge builds.
//!
//! Sizes are computed in weight units and converted to virtual bytes
//! (`ceil(weight / 4)`), fee rates are in sat/vB.

use zpl_util::Utxo;

pub const WITNESS_SCALE_FACTOR: u64 = 4;

// version + locktime
const TX_FIXED_BYTES: u64 = 8;
const SEGWIT_MARKER_FLAG_WEIGHT: u64 = 2;

// outpoint 36 + empty script_sig 1 + sequence 4
const TX_IN_BASE_BYTES: u64 = 41;
const SCHNORR_SIGNATURE_BYTES: u64 = 64;

// value 8 + script length 1 + OP_1 <32 byte key> 34
const P2TR_OUTPUT_BYTES: u64 = 43;

// <32 byte x-only key> OP_CHECKSIG
const CHECKSIG_LEAF_SCRIPT_BYTES: u64 = 34;
const CONTROL_BLOCK_BASE_BYTES: u64 = 33;
const TAPROOT_NODE_BYTES: u64 = 32;

pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

// Hot reserve buckets are spent through a single-key leaf one level deep.
pub const DEFAULT_HOT_RESERVE_MERKLE_DEPTH: u8 = 1;

pub fn var_int_len(n: u64) -> u64 {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    TaprootKeyPath,
    TaprootScriptPath { merkle_depth: u8 },
}

impl InputKind {
    fn witness_bytes(&self) -> u64 {
        let signature = var_int_len(SCHNORR_SIGNATURE_BYTES) + SCHNORR_SIGNATURE_BYTES;
        match *self {
            InputKind::TaprootKeyPath => var_int_len(1) + signature,
            InputKind::TaprootScriptPath { merkle_depth } => {
                let control_block =
                    CONTROL_BLOCK_BASE_BYTES + TAPROOT_NODE_BYTES * merkle_depth as u64;
                var_int_len(3)
                    + signature
                    + var_int_len(CHECKSIG_LEAF_SCRIPT_BYTES)
                    + CHECKSIG_LEAF_SCRIPT_BYTES
                    + var_int_len(control_block)
                    + control_block
            }
        }
    }

    pub fn weight(&self) -> u64 {
        TX_IN_BASE_BYTES * WITNESS_SCALE_FACTOR + self.witness_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxShape {
    pub inputs: u64,
    pub input_kind: InputKind,
    pub outputs: u64,
}

impl TxShape {
    pub fn new(inputs: u64, input_kind: InputKind, outputs: u64) -> Self {
        Self {
            inputs,
            input_kind,
            outputs,
        }
    }

    pub fn weight(&self) -> u64 {
        let base = TX_FIXED_BYTES + var_int_len(self.inputs) + var_int_len(self.outputs);

        (base * WITNESS_SCALE_FACTOR + SEGWIT_MARKER_FLAG_WEIGHT)
            .saturating_add(self.inputs.saturating_mul(self.input_kind.weight()))
            .saturating_add(
                self.outputs
                    .saturating_mul(P2TR_OUTPUT_BYTES * WITNESS_SCALE_FACTOR),
            )
    }

    pub fn vsize(&self) -> u64 {
        self.weight().div_ceil(WITNESS_SCALE_FACTOR)
    }
}

pub fn estimate_fee(shape: &TxShape, fee_rate: u64) -> u64 {
    shape.vsize().saturating_mul(fee_rate)
}

// Spending every UTXO to a single output, no change.
pub fn spend_all_shape(input_count: usize) -> TxShape {
    TxShape::new(input_count as u64, InputKind::TaprootKeyPath, 1)
}

// Hot reserve bucket -> cold reserve.
pub fn lock_to_cold_shape(merkle_depth: u8) -> TxShape {
    TxShape::new(1, InputKind::TaprootScriptPath { merkle_depth }, 1)
}

// Cold reserve -> user, with change back to the cold reserve.
pub fn withdrawal_shape() -> TxShape {
    TxShape::new(1, InputKind::TaprootKeyPath, 2)
}

pub fn estimate_max_spendable_amount(utxos: &[Utxo], fee_rate: u64) -> u64 {
    if utxos.is_empty() {
        return 0;
    }

    let total = crate::utxo::total_satoshis(utxos);
    let fee = estimate_fee(&spend_all_shape(utxos.len()), fee_rate);
    total.saturating_sub(fee)
}

pub fn estimated_lock_to_cold_transaction_fee(fee_rate: u64, merkle_depth: u8) -> u64 {
    estimate_fee(&lock_to_cold_shape(merkle_depth), fee_rate)
}

pub fn estimated_withdrawal_transaction_fee(fee_rate: u64) -> u64 {
    estimate_fee(&withdrawal_shape(), fee_rate)
}

pub fn service_fee(amount: u64, service_fee_bps: u64) -> u64 {
    let fee = amount as u128 * service_fee_bps as u128 / BASIS_POINTS_DENOMINATOR as u128;
    u64::try_from(fee).unwrap_or(u64::MAX)
}
