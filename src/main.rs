#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use tcxgen::{cli, generate, utils};

#[macro_use]
extern crate tcxgen;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    dlog!("mode=generate config={}", cli.config.display());

    generate::run(&cli.config)
}
