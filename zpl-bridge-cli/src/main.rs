mod bridge_service;
mod cmd;
mod formatter;

#[macro_use]
extern crate log;

use bridge_service::BridgeService;
use clap::Parser;
use cmd::Cli;

#[tokio::main]
async fn main() {
    let log_config = zpl_util::LogConfig::new(zpl_util::ZPL_BRIDGE_CLI_TOOL_NAME)
        .with_level("warn")
        .enable_file(false)
        .enable_console(true);

    let _logger = match zpl_util::init_log(log_config) {
        Ok(handle) => handle,
        Err(e) => {
            println!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let cli = Cli::parse();
    let root_dir = zpl_util::get_service_dir(zpl_util::ZPL_BRIDGE_CLI_TOOL_NAME);
    let service = match BridgeService::new(&root_dir, &cli) {
        Ok(service) => service,
        Err(e) => {
            println!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = service.process_command(cli).await {
        let msg = format!("Error processing command: {}", e);
        println!("{}", msg);
        std::process::exit(1);
    }
}
