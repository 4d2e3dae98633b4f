use std::process;
use log::{error, LevelFilter};

use regionkit::commands::{build_cli, CommandFactory, RegionkitCommandFactory};
use regionkit::config::RegionKitConfig;
use regionkit::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let config = match RegionKitConfig::load(matches.get_one::<String>("config").map(String::as_str)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    // RUST_LOG takes over console logging when set
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    } else {
        let level = if verbose {
            LevelFilter::Debug
        } else if quiet {
            LevelFilter::Warn
        } else {
            config.logging.level
        };
        if let Err(e) = Logger::init_global_logger_with_level("regionkit-global.log", level, !quiet) {
            eprintln!("Error setting up global logger: {}", e);
            process::exit(1);
        }
    }

    let logger = match Logger::with_level(&config.logging.file, config.logging.level, false) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = RegionkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &config, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
