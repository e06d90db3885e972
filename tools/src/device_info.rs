// Shows the connected device and the restore method it needs

use clap::{Arg, Command};

mod common;

#[tokio::main]
async fn main() {
    common::init_logging();

    let matches = common::device_args(
        Command::new("device_info")
            .about("Shows the connected device and how tweaks reach it")
            .arg(
                Arg::new("json")
                    .long("json")
                    .help("Print the device as JSON")
                    .action(clap::ArgAction::SetTrue),
            ),
    )
    .get_matches();

    let device = match common::get_device(&matches).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let d = &device.descriptor;

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(d) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Unable to serialize device: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if d.is_demo() {
        println!("No device available, showing the demo device\n");
    }
    println!("Name:       {}", d.name);
    println!("UDID:       {}", d.udid);
    println!("iOS:        {}", d.ios_version);
    println!("Model:      {}", d.model);
    println!("Hardware:   {}", d.hardware);
    println!("Color:      {}", d.color);
    println!("Capacity:   {}", d.capacity);
    println!("Paired:     {}", d.paired);

    let method = d.restore_method();
    if method.is_supported() {
        println!("Method:     {method}");
    } else {
        println!("Method:     none, iOS {} is not supported", d.ios_version);
    }
}
