// Common functions between tools

use std::{net::IpAddr, path::PathBuf, str::FromStr};

use chris::device::{ConnectedDevice, DeviceSelector, find_device};
use clap::{Arg, ArgMatches, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub const LABEL: &str = "chris-tools";

/// Logs to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Adds the device selection arguments shared by every device tool
pub fn device_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("IP address of the device"),
        )
        .arg(
            Arg::new("pairing_file")
                .long("pairing-file")
                .value_name("PATH")
                .help("Path to the pairing file"),
        )
        .arg(
            Arg::new("udid")
                .long("udid")
                .value_name("UDID")
                .help("UDID of the device (overrides host/pairing file)"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Use the demo device instead of looking for one")
                .action(clap::ArgAction::SetTrue),
        )
}

fn get_selector(matches: &ArgMatches) -> Result<DeviceSelector, String> {
    let udid = matches.get_one::<String>("udid");
    let host = matches.get_one::<String>("host");
    let pairing_file = matches.get_one::<String>("pairing_file");

    if let Some(udid) = udid {
        return Ok(DeviceSelector::Udid(udid.clone()));
    }
    match (host, pairing_file) {
        (Some(host), Some(pairing_file)) => {
            let host = IpAddr::from_str(host).map_err(|e| format!("Invalid host: {e:?}"))?;
            Ok(DeviceSelector::Network {
                host,
                pairing_file: PathBuf::from(pairing_file),
            })
        }
        (Some(_), None) | (None, Some(_)) => {
            Err("--host and --pairing-file must be passed together".to_string())
        }
        (None, None) => Ok(DeviceSelector::Any),
    }
}

pub async fn get_device(matches: &ArgMatches) -> Result<ConnectedDevice, String> {
    if matches.get_flag("demo") {
        info!("--demo passed, skipping device discovery");
        return Ok(ConnectedDevice::demo());
    }
    let selector = get_selector(matches)?;
    let device = find_device(&selector, LABEL)
        .await
        .map_err(|e| format!("Unable to find device: {e}"))?;
    if device.provider.is_none() {
        warn!("No usbmuxd available, falling back to the demo device");
    }
    Ok(device)
}
