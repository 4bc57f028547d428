mod address;
mod electrs;

pub use address::*;
pub use electrs::*;
