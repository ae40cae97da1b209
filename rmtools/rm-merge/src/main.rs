//! Core module for merging RepeatMasker annotation tables
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Reads a cross_match (.out) table and a divergence summary (.divsum)
//! table, filters both and writes the hits whose repeat family has a
//! matching divergence summary into a single tab-delimited table.

use clap::{self, Parser};
use config::{ArgCheck, Session};
use log::{error, info, Level};
use simple_logger::init_with_level;

use rm_merge::{cli::Args, core::merge_repeats};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let session = Session::from_env(env!("CARGO_PKG_NAME"));

    let args: Args = Args::parse();
    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    merge_repeats(args, &session).unwrap_or_else(|e| {
        error!("{:#}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
