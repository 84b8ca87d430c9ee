use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

use redlsb::{
    cli::{Cli, Commands},
    handler::{handle_decode, handle_encode},
};

fn init_logger(verbose: bool) {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();
}

/// Entry point: parses the command line, sets up logging and dispatches to
/// the subcommand handlers.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Encode(args) => handle_encode(args),
        Commands::Decode(args) => handle_decode(args),
    }
}
