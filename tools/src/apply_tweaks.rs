// Builds a payload from the chosen tweaks and applies it

use std::{path::PathBuf, sync::Arc};

use chris::{ApplyCoordinator, ApplyRequest, Catalog, SelectionSet, TransportSet, TweakValue};
use clap::{Arg, ArgMatches, Command};
use tracing::{debug, warn};

mod common;

#[tokio::main]
async fn main() {
    common::init_logging();

    let matches = common::device_args(
        Command::new("apply_tweaks")
            .about("Applies tweaks to the connected device")
            .arg(
                Arg::new("set")
                    .long("set")
                    .value_name("ID=VALUE")
                    .help("Enables a tweak, can be repeated")
                    .action(clap::ArgAction::Append),
            )
            .arg(
                Arg::new("selection")
                    .long("selection")
                    .value_name("PATH")
                    .help("Plist dictionary of tweak id to value"),
            )
            .arg(
                Arg::new("mobilegestalt")
                    .long("mobilegestalt")
                    .value_name("PATH")
                    .help("MobileGestalt plist from the device to merge into the payload"),
            )
            .arg(
                Arg::new("staging_dir")
                    .long("staging-dir")
                    .value_name("DIR")
                    .default_value("staged")
                    .help("Where payload files are written"),
            )
            .arg(
                Arg::new("reset")
                    .long("reset")
                    .help("Restore defaults by applying an empty payload")
                    .action(clap::ArgAction::SetTrue),
            ),
    )
    .get_matches();

    let catalog = match Catalog::builtin() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Unable to load catalog: {e}");
            std::process::exit(1);
        }
    };

    let reset = matches.get_flag("reset");
    let selection = match get_selection(&matches, &catalog) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    debug!("Collected {} tweaks", selection.len());
    if selection.is_empty() && !reset {
        warn!("Refusing to apply an empty selection");
        eprintln!("No tweaks enabled");
        std::process::exit(1);
    }

    let device = match common::get_device(&matches).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let version = device.descriptor.version();
    println!(
        "Applying to {} (iOS {})",
        device.descriptor.name, device.descriptor.ios_version
    );

    let staging_dir = matches
        .get_one::<String>("staging_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("staged"));
    let coordinator = ApplyCoordinator::new(catalog, TransportSet::staging(staging_dir));

    let request = if reset {
        ApplyRequest::reset(version)
    } else {
        ApplyRequest::new(selection, version)
            .with_mobilegestalt(matches.get_one::<String>("mobilegestalt").map(PathBuf::from))
    };

    let mut handle = match coordinator.start(request) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Unable to apply: {e}");
            std::process::exit(1);
        }
    };
    while let Some(p) = handle.next_progress().await {
        println!("[{:>3}%] {}", p.percent, p.message);
    }

    match handle.finish().await {
        Ok(message) => println!("{message}"),
        Err(e) => {
            eprintln!("Apply failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Collects the selection plist first, then `--set` values on top
fn get_selection(matches: &ArgMatches, catalog: &Catalog) -> Result<SelectionSet, String> {
    let mut selection = match matches.get_one::<String>("selection") {
        Some(path) => {
            let value = plist::Value::from_file(path)
                .map_err(|e| format!("Unable to read selection {path}: {e}"))?;
            let dict = value
                .as_dictionary()
                .ok_or_else(|| format!("Selection {path} is not a dictionary"))?;
            SelectionSet::from_plist(dict)
        }
        None => SelectionSet::new(),
    };

    for raw in matches.get_many::<String>("set").unwrap_or_default() {
        let (id, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("Expected ID=VALUE, got {raw}"))?;
        let value = match catalog.get(id) {
            Some(d) => TweakValue::parse_as(d.kind(), value)
                .ok_or_else(|| format!("{id} expects a {} value, got {value}", d.kind()))?,
            // Dropped during validation
            None => {
                warn!("Unknown tweak {id}, it will be ignored");
                TweakValue::Text(value.to_string())
            }
        };
        selection.insert(id, value);
    }

    Ok(selection)
}
