use zpl_bridge::{
    Asset, DepositQuote, Interaction, PendingDeposit, UtxoPartition, WithdrawQuote, fiat_value,
    format_amount,
};

pub struct QuoteFormatter;

impl QuoteFormatter {
    pub fn print_balance(
        asset: Asset,
        partition: &UtxoPartition,
        max_spendable: u64,
        price: Option<f64>,
    ) {
        println!("\n┌──────────────────┬──────────────────────┬────────────────────┐");
        println!("│ {:<16} │ {:>20} │ {:>18} │", asset.symbol(), "Amount", "Satoshis");
        println!("├──────────────────┼──────────────────────┼────────────────────┤");
        Self::print_row(asset, "Total", partition.total_satoshis());
        Self::print_row(asset, "Available", partition.available_satoshis());
        Self::print_row(asset, "Unavailable", partition.unavailable_satoshis());
        Self::print_row(asset, "Max spendable", max_spendable);
        println!("└──────────────────┴──────────────────────┴────────────────────┘");

        println!(
            "{} available UTXOs, {} reserved by pending deposits",
            partition.available.len(),
            partition.unavailable.len()
        );
        Self::print_fiat(asset, "Available value", partition.available_satoshis(), price);
    }

    pub fn print_deposit(quote: &DepositQuote, fee_rate: u64, price: Option<f64>) {
        let asset = quote.asset;
        println!("\nDeposit {} -> {} at {} sat/vB", asset, asset.z_asset_name(), fee_rate);
        println!("\n┌──────────────────┬──────────────────────┬────────────────────┐");
        Self::print_row(asset, "Lock", quote.amount);
        Self::print_row(asset, "Lock-to-cold fee", quote.miner_fee);
        Self::print_row(asset, "Mint (estimated)", quote.received);
        Self::print_row(asset, "Max spendable", quote.max_spendable);
        println!("└──────────────────┴──────────────────────┴────────────────────┘");

        if quote.is_deposit_all {
            println!("This deposit spends every available UTXO");
        }
        Self::print_fiat(asset, "Lock value", quote.amount, price);
        Self::print_fiat(asset, "Mint value", quote.received, price);
    }

    pub fn print_withdraw(quote: &WithdrawQuote, fee_rate: u64, price: Option<f64>) {
        let asset = quote.asset;
        println!(
            "\nWithdraw {} ({}) -> {} at {} sat/vB",
            asset.z_asset_name(),
            quote.source,
            asset,
            fee_rate
        );
        println!("\n┌──────────────────┬──────────────────────┬────────────────────┐");
        Self::print_row(asset, "Burn", quote.amount);
        Self::print_row(asset, "Balance", quote.balance);
        Self::print_row(asset, "Miner fee", quote.miner_fee);
        Self::print_row(asset, "Service fee", quote.service_fee);
        Self::print_row(asset, "Receive (est.)", quote.received);
        println!("└──────────────────┴──────────────────────┴────────────────────┘");

        Self::print_fiat(asset, "Burn value", quote.amount, price);
        Self::print_fiat(asset, "Receive value", quote.received, price);
        println!("The withdrawal process takes about 24 hours");
    }

    pub fn print_interactions(interactions: &[Interaction]) {
        if interactions.is_empty() {
            println!("No interactions found.");
            return;
        }

        for interaction in interactions {
            println!(
                "{:<20} {:<10} {:<10} {:<40} {}",
                interaction.interaction_id,
                format!("{:?}", interaction.interaction_type),
                Self::step_label(interaction),
                interaction.status.to_string(),
                if interaction.status.is_settled() {
                    "settled"
                } else {
                    "in flight"
                }
            );
        }
    }

    // Step and length both come from the status's own pipeline.
    fn step_label(interaction: &Interaction) -> String {
        let pipeline = interaction.status.interaction_type().pipeline();
        format!("step {}/{}", interaction.status.step(), pipeline.len())
    }

    pub fn print_pending(asset: Asset, entries: &[PendingDeposit]) {
        if entries.is_empty() {
            println!("No pending deposits.");
            return;
        }

        for entry in entries {
            println!(
                "{} {} {} spending {} UTXOs, cached at {}",
                entry.transaction_id,
                format_amount(entry.amount, asset.decimals()),
                asset,
                entry.utxos.len(),
                entry.created_at
            );
            for utxo in &entry.utxos {
                println!("    {}", utxo);
            }
        }
    }

    fn print_row(asset: Asset, label: &str, amount: u64) {
        println!(
            "│ {:<16} │ {:>20} │ {:>18} │",
            label,
            format_amount(amount, asset.decimals()),
            Self::format_number(amount)
        );
    }

    fn print_fiat(asset: Asset, label: &str, amount: u64, price: Option<f64>) {
        if let Some(price) = price {
            println!(
                "{}: {:.2} USDT",
                label,
                fiat_value(amount, asset.decimals(), price)
            );
        }
    }

    // Add thousand separators for better readability
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zpl_bridge::{InteractionStatus, InteractionType};

    fn interaction(interaction_type: InteractionType, status: InteractionStatus) -> Interaction {
        Interaction {
            interaction_id: "i1".to_string(),
            interaction_type,
            status,
            amount: 0,
            deposit_transaction_id: None,
            deposit_utxos: vec![],
            initiated_at: 0,
        }
    }

    #[test]
    fn test_step_label() {
        let deposit = interaction(
            InteractionType::Deposit,
            InteractionStatus::AddLockToColdReserveProposal,
        );
        assert_eq!(QuoteFormatter::step_label(&deposit), "step 4/7");

        // Type disagrees with the status
        let mismatched = interaction(
            InteractionType::Withdrawal,
            InteractionStatus::SolanaLockToColdReserve,
        );
        assert_eq!(QuoteFormatter::step_label(&mismatched), "step 7/7");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(QuoteFormatter::format_number(0), "0");
        assert_eq!(QuoteFormatter::format_number(999), "999");
        assert_eq!(QuoteFormatter::format_number(1_000), "1,000");
        assert_eq!(QuoteFormatter::format_number(123_456_789), "123,456,789");
    }
}
