// Restarts the device so applied tweaks take effect

use clap::Command;

mod common;

#[tokio::main]
async fn main() {
    common::init_logging();

    let matches = common::device_args(
        Command::new("respring").about("Restarts the device through the diagnostics relay"),
    )
    .get_matches();

    let device = match common::get_device(&matches).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let Some(provider) = device.provider else {
        eprintln!("The demo device can't be restarted");
        std::process::exit(1);
    };

    match chris::device::respring(&*provider).await {
        Ok(()) => println!("Restarting {}", device.descriptor.name),
        Err(e) => {
            eprintln!("Respring failed: {e}");
            std::process::exit(1);
        }
    }
}
