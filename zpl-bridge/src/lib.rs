mod amount;
mod asset;
mod config;
mod deposit;
mod fee;
mod interaction;
mod pending;
mod price;
mod utxo;
mod withdraw;

#[macro_use]
extern crate log;

pub use amount::*;
pub use asset::*;
pub use config::*;
pub use deposit::*;
pub use fee::*;
pub use interaction::*;
pub use pending::*;
pub use price::*;
pub use utxo::*;
pub use withdraw::*;

pub use zpl_util::{Utxo, UtxoRef};
