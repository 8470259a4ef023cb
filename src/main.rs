#![forbid(unsafe_code)]

//! acuity: visual acuity chart kiosk entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("acuity: {e}");
        std::process::exit(1);
    }
}
