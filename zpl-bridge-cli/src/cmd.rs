use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use zpl_bridge::{Asset, WithdrawSource};
use zpl_util::UtxoRef;

#[derive(Parser)]
#[command(name = "zpl-bridge-cli")]
#[command(about = "ZPL UTXO bridge deposit and withdrawal calculator")]
pub struct Cli {
    /// Asset to bridge: BTC, DOGE or LTC
    #[arg(long, default_value = "BTC", value_parser = parse_asset)]
    pub asset: Asset,

    /// Fee rate in sat/vB, overrides the configured one
    #[arg(long, value_name = "SAT_PER_VB")]
    pub fee_rate: Option<u64>,

    /// Skip the price lookup
    #[arg(long, default_value_t = false)]
    pub no_price: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show total, available and reserved wallet balance
    Balance {
        #[clap(flatten)]
        wallet: WalletArgs,
    },

    /// Quote a deposit into the hot reserve bucket
    Deposit {
        /// Amount to lock, in coins (e.g. 0.01)
        #[arg(long)]
        amount: String,

        #[clap(flatten)]
        wallet: WalletArgs,
    },

    /// Quote a withdrawal to the Bitcoin side
    Withdraw {
        /// Amount of zBTC to burn, in coins
        #[arg(long)]
        amount: String,

        /// JSON file with the owner's custodial positions
        #[arg(long, value_name = "FILE")]
        positions: Option<PathBuf>,

        /// zBTC balance of the Solana wallet, in coins
        #[arg(long, default_value = "0")]
        wallet_balance: String,

        /// custodial or wallet, defaults to the larger balance
        #[arg(long, value_parser = parse_withdraw_source)]
        source: Option<WithdrawSource>,
    },

    /// Show the asset price and 24h change
    Price,

    /// Show bridge interactions and their settlement step
    Status {
        /// JSON file with interactions reported by the backend
        #[arg(long, value_name = "FILE")]
        interactions: PathBuf,
    },

    /// Manage deposits broadcast but not yet reported by the backend
    Pending {
        #[command(subcommand)]
        command: PendingCommands,
    },
}

#[derive(Subcommand)]
pub enum PendingCommands {
    /// List cached pending deposits
    List,

    /// Record a broadcast deposit and the outputs it spends
    Add {
        #[arg(long)]
        txid: String,

        /// Spent output as txid:vout, repeatable
        #[arg(long = "utxo", value_name = "TXID:VOUT", value_parser = parse_utxo_ref, num_args = 1.., required = true)]
        utxos: Vec<UtxoRef>,

        /// Deposited amount, in coins
        #[arg(long)]
        amount: String,
    },

    /// Remove a cached deposit
    Remove {
        #[arg(long)]
        txid: String,
    },

    /// Drop deposits the backend reports and expired ones
    Prune {
        #[arg(long, value_name = "FILE")]
        interactions: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WalletArgs {
    #[clap(flatten)]
    pub source: UtxoSource,

    /// JSON file with interactions reported by the backend
    #[arg(long, value_name = "FILE")]
    pub interactions: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct UtxoSource {
    /// Wallet address, UTXOs are fetched from electrs
    #[arg(long)]
    pub address: Option<String>,

    /// JSON file with the wallet UTXOs
    #[arg(long, value_name = "FILE")]
    pub utxos: Option<PathBuf>,
}

fn parse_asset(s: &str) -> Result<Asset, String> {
    s.parse::<Asset>()
}

fn parse_withdraw_source(s: &str) -> Result<WithdrawSource, String> {
    s.parse::<WithdrawSource>()
}

fn parse_utxo_ref(s: &str) -> Result<UtxoRef, String> {
    s.parse::<UtxoRef>()
}
