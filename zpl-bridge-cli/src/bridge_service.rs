use super::cmd::{Cli, Commands, PendingCommands, WalletArgs};
use super::formatter::QuoteFormatter;
use std::path::{Path, PathBuf};
use zpl_bridge::{
    Asset, BridgeConfig, DepositQuote, Interaction, PendingDeposit, PendingDepositCache,
    PriceClient, UtxoPartition, WithdrawBalances, WithdrawQuote, committed_utxos,
    load_interactions_from_file, load_positions_from_file, max_spendable_amount, now_secs,
    parse_amount, partition_utxos,
};
use zpl_util::{ElectrsClient, Utxo, load_utxos_from_file, parse_address};

pub struct BridgeService {
    config: BridgeConfig,
    asset: Asset,
    pending_path: PathBuf,
    no_price: bool,
}

impl BridgeService {
    pub fn new(root_dir: &Path, cli: &Cli) -> Result<Self, String> {
        let mut config = BridgeConfig::load(root_dir)?;
        if let Some(fee_rate) = cli.fee_rate {
            info!("Using fee rate {} sat/vB from command line", fee_rate);
            config.fee.fee_rate = fee_rate;
        }

        Ok(Self {
            config,
            asset: cli.asset,
            pending_path: root_dir.join(zpl_util::PENDING_DEPOSITS_FILE_NAME),
            no_price: cli.no_price,
        })
    }

    pub async fn process_command(&self, cli: Cli) -> Result<(), String> {
        match cli.command {
            Commands::Balance { wallet } => {
                let partition = self.load_wallet(&wallet).await?;
                let max_spendable = max_spendable_amount(
                    self.asset,
                    &partition.available,
                    self.config.fee.fee_rate,
                );
                let price = self.price().await;

                QuoteFormatter::print_balance(self.asset, &partition, max_spendable, price);
            }
            Commands::Deposit { amount, wallet } => {
                let amount = parse_amount(&amount, self.asset.decimals())?;
                let partition = self.load_wallet(&wallet).await?;
                let quote =
                    DepositQuote::new(self.asset, amount, &partition.available, &self.config.fee)?;
                let price = self.price().await;

                QuoteFormatter::print_deposit(&quote, self.config.fee.fee_rate, price);
            }
            Commands::Withdraw {
                amount,
                positions,
                wallet_balance,
                source,
            } => {
                let decimals = self.asset.decimals();
                let amount = parse_amount(&amount, decimals)?;
                let wallet_balance = parse_amount(&wallet_balance, decimals)?;
                let positions = match positions {
                    Some(path) => load_positions_from_file(&path)?,
                    None => Vec::new(),
                };

                let balances = WithdrawBalances::new(&positions, wallet_balance);
                let source = source.unwrap_or_else(|| balances.default_source());
                let quote =
                    WithdrawQuote::new(self.asset, amount, source, &balances, &self.config.fee)?;
                let price = self.price().await;

                QuoteFormatter::print_withdraw(&quote, self.config.fee.fee_rate, price);
            }
            Commands::Price => {
                let client = PriceClient::new(&self.config.price)?;
                let price = client.get_price(self.asset).await?;
                let change = client.get_price_change_percent(self.asset).await?;
                println!(
                    "{}: {:.2} USDT ({:+.2}% 24h)",
                    self.asset.symbol(),
                    price,
                    change
                );
            }
            Commands::Status { interactions } => {
                let interactions = load_interactions_from_file(&interactions)?;
                QuoteFormatter::print_interactions(&interactions);
            }
            Commands::Pending { command } => {
                self.process_pending_command(command)?;
            }
        }

        Ok(())
    }

    fn process_pending_command(&self, command: PendingCommands) -> Result<(), String> {
        let mut cache = PendingDepositCache::load(&self.pending_path)?;

        match command {
            PendingCommands::List => {
                QuoteFormatter::print_pending(self.asset, cache.entries());
                return Ok(());
            }
            PendingCommands::Add {
                txid,
                utxos,
                amount,
            } => {
                let amount = parse_amount(&amount, self.asset.decimals())?;
                cache.add(PendingDeposit {
                    transaction_id: txid.clone(),
                    utxos,
                    amount,
                    created_at: now_secs(),
                })?;
                println!("Cached pending deposit {}", txid);
            }
            PendingCommands::Remove { txid } => {
                if !cache.remove(&txid) {
                    let msg = format!("No pending deposit {}", txid);
                    println!("{}", msg);
                    return Err(msg);
                }
                println!("Removed pending deposit {}", txid);
            }
            PendingCommands::Prune { interactions } => {
                let interactions = self.load_interactions(interactions.as_deref())?;
                let removed =
                    cache.prune(&interactions, now_secs(), self.config.cache.pending_ttl_secs);
                println!("Removed {} pending deposits", removed);
            }
        }

        cache.save()
    }

    // Wallet UTXOs with the ones spent by in-flight deposits set aside.
    async fn load_wallet(&self, wallet: &WalletArgs) -> Result<UtxoPartition, String> {
        let utxos = self.load_utxos(wallet).await?;
        let interactions = self.load_interactions(wallet.interactions.as_deref())?;

        let mut cache = PendingDepositCache::load(&self.pending_path)?;
        let removed = cache.prune(&interactions, now_secs(), self.config.cache.pending_ttl_secs);
        if removed > 0 {
            cache.save()?;
        }

        let committed = committed_utxos(&interactions, cache.entries());
        Ok(partition_utxos(&utxos, &committed))
    }

    async fn load_utxos(&self, wallet: &WalletArgs) -> Result<Vec<Utxo>, String> {
        if let Some(ref path) = wallet.source.utxos {
            return load_utxos_from_file(path);
        }

        let address = match wallet.source.address {
            Some(ref address) => address,
            None => {
                let msg = "Either an address or a UTXO file is required".to_string();
                println!("{}", msg);
                return Err(msg);
            }
        };

        if !self.asset.has_indexer() {
            let msg = format!(
                "{} UTXOs cannot be fetched from electrs, use --utxos",
                self.asset
            );
            println!("{}", msg);
            return Err(msg);
        }

        let address = parse_address(address, self.config.btc.network())?;
        let client = ElectrsClient::new(self.config.electrs.rpc_url())?;
        client.list_unspent(&address).await
    }

    fn load_interactions(&self, path: Option<&Path>) -> Result<Vec<Interaction>, String> {
        match path {
            Some(path) => load_interactions_from_file(path),
            None => Ok(Vec::new()),
        }
    }

    // Fiat values are left out when the price is unavailable.
    async fn price(&self) -> Option<f64> {
        if self.no_price {
            return None;
        }

        let client = match PriceClient::new(&self.config.price) {
            Ok(client) => client,
            Err(e) => {
                warn!("Price lookup disabled: {}", e);
                return None;
            }
        };

        match client.get_price(self.asset).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!("Failed to get {} price: {}", self.asset, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use zpl_util::UtxoRef;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn utxo_ref(txid: &str, vout: u32) -> UtxoRef {
        UtxoRef {
            transaction_id: txid.to_string(),
            transaction_index: vout,
        }
    }

    #[tokio::test]
    async fn test_load_wallet_sets_aside_committed_utxos() {
        let root = temp_root("zpl_cli_load_wallet_test");

        let utxos_path = root.join("utxos.json");
        std::fs::write(
            &utxos_path,
            r#"[
                {"transaction_id": "aa", "transaction_index": 0, "satoshis": 50000},
                {"transaction_id": "aa", "transaction_index": 1, "satoshis": 20000},
                {"transaction_id": "bb", "transaction_index": 0, "satoshis": 30000},
                {"transaction_id": "cc", "transaction_index": 2, "satoshis": 7000}
            ]"#,
        )
        .unwrap();

        // One deposit still in flight, one settled whose UTXO is free again
        let interactions_path = root.join("interactions.json");
        std::fs::write(
            &interactions_path,
            r#"[
                {
                    "interaction_id": "d1",
                    "interaction_type": "Deposit",
                    "status": "SolanaDepositToHotReserve",
                    "deposit_transaction_id": "d1tx",
                    "deposit_utxos": [{"transaction_id": "aa", "transaction_index": 1}]
                },
                {
                    "interaction_id": "d0",
                    "interaction_type": "Deposit",
                    "status": "SolanaLockToColdReserve",
                    "deposit_transaction_id": "d0tx",
                    "deposit_utxos": [{"transaction_id": "cc", "transaction_index": 2}]
                }
            ]"#,
        )
        .unwrap();

        let pending_path = root.join(zpl_util::PENDING_DEPOSITS_FILE_NAME);
        let mut cache = PendingDepositCache::load(&pending_path).unwrap();
        cache
            .add(PendingDeposit {
                transaction_id: "p1tx".to_string(),
                utxos: vec![utxo_ref("bb", 0)],
                amount: 25000,
                created_at: now_secs(),
            })
            .unwrap();
        cache
            .add(PendingDeposit {
                transaction_id: "oldtx".to_string(),
                utxos: vec![utxo_ref("aa", 0)],
                amount: 40000,
                created_at: 0,
            })
            .unwrap();
        cache.save().unwrap();

        let cli = Cli::try_parse_from([
            "zpl-bridge-cli",
            "--no-price",
            "balance",
            "--utxos",
            utxos_path.to_str().unwrap(),
            "--interactions",
            interactions_path.to_str().unwrap(),
        ])
        .unwrap();
        let service = BridgeService::new(&root, &cli).unwrap();

        let wallet = match cli.command {
            Commands::Balance { ref wallet } => wallet.clone(),
            _ => panic!("expected balance command"),
        };
        let partition = service.load_wallet(&wallet).await.unwrap();

        let available: Vec<UtxoRef> = partition.available.iter().map(|u| u.utxo_ref()).collect();
        let unavailable: Vec<UtxoRef> =
            partition.unavailable.iter().map(|u| u.utxo_ref()).collect();
        assert_eq!(available, vec![utxo_ref("aa", 0), utxo_ref("cc", 2)]);
        assert_eq!(unavailable, vec![utxo_ref("aa", 1), utxo_ref("bb", 0)]);
        assert_eq!(partition.total_satoshis(), 107000);

        // The expired entry was pruned and the cache written back
        let cache = PendingDepositCache::load(&pending_path).unwrap();
        assert_eq!(cache.entries().len(), 1);
        assert_eq!(cache.entries()[0].transaction_id, "p1tx");
    }

    #[tokio::test]
    async fn test_load_wallet_requires_indexer_for_address() {
        let root = temp_root("zpl_cli_load_wallet_doge_test");
        let cli = Cli::try_parse_from([
            "zpl-bridge-cli",
            "--asset",
            "DOGE",
            "balance",
            "--address",
            "DH5yaieqoZN36fDVciNyRueRGvGLR3mr7L",
        ])
        .unwrap();
        let service = BridgeService::new(&root, &cli).unwrap();

        let wallet = match cli.command {
            Commands::Balance { ref wallet } => wallet.clone(),
            _ => panic!("expected balance command"),
        };
        assert!(service.load_wallet(&wallet).await.is_err());
    }
}
