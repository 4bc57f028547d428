
// Service names
pub const ZPL_BRIDGE_CLI_TOOL_NAME: &str = "zpl-bridge-cli";

// Directory constants
pub const ZPL_ROOT_DIR: &str = ".zpl";

// File names inside a service directory
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const PENDING_DEPOSITS_FILE_NAME: &str = "pending_deposits.json";

// Smallest deposit or withdrawal accepted by the bridge, 0.0001 of a coin
pub const DEFAULT_MIN_AMOUNT_SATS: u64 = 10_000;

pub const DEFAULT_FEE_RATE_SAT_PER_VB: u64 = 2;
pub const DEFAULT_SERVICE_FEE_BPS: u64 = 20;
pub const DEFAULT_PENDING_TTL_SECS: u64 = 24 * 60 * 60;
