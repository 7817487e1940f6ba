mod args;
mod survey;

use clap::Parser;
use log::debug;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("main: args: {:?}", args);

    if let Err(e) = survey::run_dashboard(&args) {
        eprintln!("An error occured: {}", e);
        if let Some(source) = std::error::Error::source(&e) {
            eprintln!("Caused by: {}", source);
        }
        std::process::exit(1);
    }
}
