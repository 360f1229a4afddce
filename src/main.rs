use std::env;

use anyhow::Context;
use log::LevelFilter;
use structopt::StructOpt;

use dfu_touch::{find_upload_port, touch, Backend, SystemBackend, TouchConfig};

mod cli;

fn list_ports(config: &TouchConfig) -> Result<(), anyhow::Error> {
    let ports = SystemBackend
        .available_ports()
        .context("Could not list serial ports")?;

    if ports.is_empty() {
        println!("No serial ports found");

        return Ok(());
    }

    // Mark the port that auto-discovery would pick
    let selected = find_upload_port(&ports, &config.markers).map(|port| port.name.as_str());

    for port in &ports {
        let mark = if Some(port.name.as_str()) == selected {
            "*"
        } else {
            " "
        };

        println!("{} {:<24} {}", mark, port.name, port.description);
    }

    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_timed_builder();

    builder.filter_level(level);

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}

fn main() -> Result<(), anyhow::Error> {
    use cli::Command;

    // Parse the command-line arguments
    let opts = cli::Opts::from_args();

    init_logger(opts.verbose);

    let config = opts.touch_config();

    match opts.command.unwrap_or(Command::Touch) {
        Command::Touch => {
            // The upload goes ahead whatever happens here, so the outcome is only reported
            let outcome = touch(&SystemBackend, &config, |step| println!("{}", step));

            println!("{}", outcome);
        }
        Command::List => list_ports(&config)?,
    }

    Ok(())
}
