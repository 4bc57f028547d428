use bitcoincore_rpc::bitcoin::address::{Address, NetworkChecked};
use bitcoincore_rpc::bitcoin::Network;
use std::str::FromStr;

pub fn parse_address(address: &str, network: Network) -> Result<Address<NetworkChecked>, String> {
    let addr = Address::from_str(address).map_err(|e| {
        let msg = format!("Invalid address {}: {}", address, e);
        error!("{}", msg);
        msg
    })?;

    addr.require_network(network).map_err(|e| {
        let msg = format!("Address network mismatch for {}: {}", address, e);
        error!("{}", msg);
        msg
    })
}
