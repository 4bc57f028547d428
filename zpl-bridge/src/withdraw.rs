use crate::amount::check_amount_range;
use crate::asset::Asset;
use crate::config::FeeConfig;
use crate::fee::{estimated_withdrawal_transaction_fee, service_fee};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Custodial zBTC held for an owner by the two-way peg program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub owner: String,
    pub stored_amount: u64,
    #[serde(default)]
    pub frozen_amount: u64,
}

impl Position {
    // Negative when the position is frozen above what it stores.
    pub fn net_amount(&self) -> i128 {
        if self.frozen_amount > self.stored_amount {
            warn!(
                "Position of {} has frozen {} above stored {}",
                self.owner, self.frozen_amount, self.stored_amount
            );
        }
        self.stored_amount as i128 - self.frozen_amount as i128
    }
}

// Sum of stored minus frozen over all positions, floored at zero as a whole.
pub fn withdrawable_amount(positions: &[Position]) -> u64 {
    let total: i128 = positions.iter().map(Position::net_amount).sum();
    u64::try_from(total.max(0)).unwrap_or(u64::MAX)
}

pub fn load_positions_from_file(path: &Path) -> Result<Vec<Position>, String> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        let msg = format!("Failed to read positions file {}: {}", path.display(), e);
        error!("{}", msg);
        msg
    })?;

    serde_json::from_str(&data).map_err(|e| {
        let msg = format!("Failed to parse positions file {}: {}", path.display(), e);
        error!("{}", msg);
        msg
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawSource {
    // zBTC locked in the vault
    Custodial,
    // zBTC held in the Solana wallet
    Wallet,
}

impl FromStr for WithdrawSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "custodial" => Ok(WithdrawSource::Custodial),
            "wallet" => Ok(WithdrawSource::Wallet),
            _ => Err(format!("Invalid withdraw source: {}", s)),
        }
    }
}

impl std::fmt::Display for WithdrawSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawSource::Custodial => f.write_str("custodial"),
            WithdrawSource::Wallet => f.write_str("wallet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WithdrawBalances {
    pub custodial: u64,
    pub wallet: u64,
}

impl WithdrawBalances {
    pub fn new(positions: &[Position], wallet: u64) -> Self {
        Self {
            custodial: withdrawable_amount(positions),
            wallet,
        }
    }

    pub fn balance(&self, source: WithdrawSource) -> u64 {
        match source {
            WithdrawSource::Custodial => self.custodial,
            WithdrawSource::Wallet => self.wallet,
        }
    }

    pub fn default_source(&self) -> WithdrawSource {
        if self.custodial > self.wallet {
            WithdrawSource::Custodial
        } else {
            WithdrawSource::Wallet
        }
    }
}

/// What the user receives on the Bitcoin side for burning `amount` zBTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawQuote {
    pub asset: Asset,
    pub source: WithdrawSource,
    pub amount: u64,
    pub balance: u64,
    pub miner_fee: u64,
    pub service_fee: u64,
    pub received: u64,
}

impl WithdrawQuote {
    pub fn new(
        asset: Asset,
        amount: u64,
        source: WithdrawSource,
        balances: &WithdrawBalances,
        fee: &FeeConfig,
    ) -> Result<Self, String> {
        let balance = balances.balance(source);
        check_amount_range(amount, fee.min_amount, balance, asset.decimals()).map_err(|msg| {
            warn!("Rejected {} withdrawal from {}: {}", asset, source, msg);
            msg
        })?;

        let miner_fee = estimated_withdrawal_transaction_fee(fee.fee_rate);
        let service_fee = service_fee(amount, fee.service_fee_bps);
        let quote = Self {
            asset,
            source,
            amount,
            balance,
            miner_fee,
            service_fee,
            received: amount
                .saturating_sub(miner_fee)
                .saturating_sub(service_fee),
        };

        debug!("Withdraw quote: {:?}", quote);
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::{estimate_fee, withdrawal_shape};

    fn position(stored: u64, frozen: u64) -> Position {
        Position {
            owner: "owner".to_string(),
            stored_amount: stored,
            frozen_amount: frozen,
        }
    }

    fn fee_config(fee_rate: u64) -> FeeConfig {
        FeeConfig {
            fee_rate,
            service_fee_bps: 20,
            ..FeeConfig::default()
        }
    }

    #[test]
    fn test_withdrawable_amount() {
        assert_eq!(withdrawable_amount(&[]), 0);
        let positions = vec![position(100_000, 30_000), position(50_000, 0)];
        assert_eq!(withdrawable_amount(&positions), 120_000);

        // Over-frozen positions reduce the total instead of counting as zero
        let positions = vec![position(100_000, 0), position(10, 20)];
        assert_eq!(withdrawable_amount(&positions), 99_990);

        let positions = vec![position(10, 0), position(0, 50)];
        assert_eq!(withdrawable_amount(&positions), 0);

        let positions = vec![position(u64::MAX, 0), position(u64::MAX, 0)];
        assert_eq!(withdrawable_amount(&positions), u64::MAX);
    }

    #[test]
    fn test_positions_json() {
        let data = r#"[{"owner": "abc", "storedAmount": 5000, "frozenAmount": 1000}, {"owner": "def", "storedAmount": 7}]"#;
        let positions: Vec<Position> = serde_json::from_str(data).unwrap();
        assert_eq!(positions[0].net_amount(), 4000);
        assert_eq!(positions[1].frozen_amount, 0);
    }

    #[test]
    fn test_load_positions_from_file() {
        let dir = std::env::temp_dir().join("zpl_positions_file_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("positions.json");
        assert!(load_positions_from_file(&path).is_err());

        std::fs::write(&path, r#"[{"owner": "abc", "stored_amount": 5000}]"#).unwrap();
        assert!(load_positions_from_file(&path).is_err());

        std::fs::write(&path, r#"[{"owner": "abc", "storedAmount": 5000, "frozenAmount": 500}]"#)
            .unwrap();
        let positions = load_positions_from_file(&path).unwrap();
        assert_eq!(withdrawable_amount(&positions), 4_500);
    }

    #[test]
    fn test_default_source() {
        let balances = WithdrawBalances::new(&[position(200_000, 0)], 100_000);
        assert_eq!(balances.default_source(), WithdrawSource::Custodial);

        let balances = WithdrawBalances::new(&[position(200_000, 0)], 200_000);
        assert_eq!(balances.default_source(), WithdrawSource::Wallet);
    }

    #[test]
    fn test_withdraw_quote() {
        let balances = WithdrawBalances::new(&[position(2_000_000, 0)], 0);
        let quote = WithdrawQuote::new(
            Asset::Btc,
            1_000_000,
            WithdrawSource::Custodial,
            &balances,
            &fee_config(4),
        )
        .unwrap();

        assert_eq!(quote.miner_fee, estimate_fee(&withdrawal_shape(), 4));
        assert_eq!(quote.service_fee, 2_000);
        assert_eq!(quote.received, 1_000_000 - quote.miner_fee - 2_000);
    }

    #[test]
    fn test_withdraw_checks_selected_balance() {
        let balances = WithdrawBalances::new(&[position(2_000_000, 0)], 50_000);
        let config = fee_config(4);
        assert!(
            WithdrawQuote::new(Asset::Btc, 100_000, WithdrawSource::Wallet, &balances, &config)
                .is_err()
        );
        assert!(
            WithdrawQuote::new(Asset::Btc, 100_000, WithdrawSource::Custodial, &balances, &config)
                .is_ok()
        );
        assert!(
            WithdrawQuote::new(Asset::Btc, 0, WithdrawSource::Custodial, &balances, &config)
                .is_err()
        );
    }

    #[test]
    fn test_received_decreases_with_fee_rate() {
        let balances = WithdrawBalances::new(&[], 100_000_000);
        let mut last = u64::MAX;
        for fee_rate in 1..200 {
            let quote = WithdrawQuote::new(
                Asset::Btc,
                10_000_000,
                WithdrawSource::Wallet,
                &balances,
                &fee_config(fee_rate),
            )
            .unwrap();
            assert!(quote.received < last);
            last = quote.received;
        }
    }

    #[test]
    fn test_parse_withdraw_source() {
        assert_eq!("Custodial".parse::<WithdrawSource>().unwrap(), WithdrawSource::Custodial);
        assert_eq!("wallet".parse::<WithdrawSource>().unwrap(), WithdrawSource::Wallet);
        assert!("vault".parse::<WithdrawSource>().is_err());
    }
}
