mod btc;
mod config;
mod constants;
mod dirs;
mod log_util;
mod types;

pub use btc::*;
pub use config::*;
pub use constants::*;
pub use dirs::*;
pub use log_util::*;
pub use types::*;

#[macro_use]
extern crate log;

pub use bitcoincore_rpc::bitcoin;
