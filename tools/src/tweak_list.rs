// Lists the tweak catalog

use chris::{Catalog, IosVersion, RestoreMethod, Subsystem, TweakDefinition};
use clap::{Arg, Command};

mod common;

#[tokio::main]
async fn main() {
    common::init_logging();

    let matches = Command::new("tweak_list")
        .about("Lists every tweak that can be applied")
        .arg(
            Arg::new("ios")
                .long("ios")
                .value_name("VERSION")
                .help("Only show tweaks usable on this iOS version"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the catalog as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let catalog = match Catalog::builtin() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Unable to load catalog: {e}");
            std::process::exit(1);
        }
    };
    let version = matches.get_one::<String>("ios").map(|v| IosVersion::parse(v));
    let visible = |d: &&TweakDefinition| version.as_ref().is_none_or(|v| d.is_eligible(v));

    if matches.get_flag("json") {
        let definitions: Vec<&TweakDefinition> = catalog.all().iter().filter(visible).collect();
        match serde_json::to_string_pretty(&definitions) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Unable to serialize catalog: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(v) = &version {
        println!("iOS {v} uses {}", RestoreMethod::resolve(v));
    }

    for subsystem in Subsystem::ALL {
        let definitions: Vec<&TweakDefinition> =
            catalog.by_subsystem(subsystem).filter(visible).collect();
        if definitions.is_empty() {
            continue;
        }
        println!("\n{} ({})", subsystem.title(), definitions.len());

        let mut category = "";
        for d in definitions {
            if d.category != category {
                category = &d.category;
                println!("  {category}");
            }
            let mut marks = String::new();
            if d.risky {
                marks.push_str(" [risky]");
            }
            if d.exclusive {
                marks.push_str(" [new]");
            }
            println!(
                "    {:<28} {} ({}, {}){marks}",
                d.id,
                d.name,
                d.kind(),
                d.ios_range()
            );
            if !d.description.is_empty() {
                println!("    {:<28} {}", "", d.description);
            }
        }
    }

    println!(
        "\n{} tweaks, {} new",
        catalog.len(),
        catalog.exclusive().count()
    );
}
