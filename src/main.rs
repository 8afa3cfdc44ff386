//! This crate encodes random blocks of input symbols with a convolutional code and saves the
//! input and output symbols to a JSON file. The code is read from a JSON file holding a
//! `CodeDefinition` (the rate-1/2 code of constraint length 3 with generator polynomials `0b111`
//! and `0b101` is used if none is given).
//!
//! Build the executable with `cargo build --release` and then run `./target/release/convcode -h`
//! for help on the command-line interface.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::Result;
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use convcode::{batch, CodeDefinition};
use std::time::Instant;

/// Main function
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    let code = code_from_matches(&matches)?;
    tracing::info!("Code definition:\n{}", code.encoder()?);
    let results = batch::run_encoding_batch(&code, &batch_params_from_matches(&matches))?;
    results.save(json_filename_from_matches(&matches))?;
    tracing::info!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Encodes random blocks of symbols with a convolutional code")
        .arg(code_filename())
        .arg(num_symbols_per_block())
        .arg(num_blocks())
        .arg(json_filename())
}

/// Returns argument for name of JSON file holding the code definition.
fn code_filename() -> Arg {
    Arg::new("code_filename")
        .short('c')
        .help("Name of JSON file holding the code definition (default code if absent)")
}

/// Returns argument for number of symbols per block.
fn num_symbols_per_block() -> Arg {
    Arg::new("num_symbols_per_block")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("64")
        .help("Number of input symbols per block")
}

/// Returns argument for number of blocks.
fn num_blocks() -> Arg {
    Arg::new("num_blocks")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("16")
        .help("Number of blocks to be encoded")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns code definition based on command-line arguments.
fn code_from_matches(matches: &ArgMatches) -> Result<CodeDefinition> {
    match matches.get_one::<String>("code_filename") {
        Some(filename) => Ok(CodeDefinition::from_json_file(filename)?),
        None => Ok(CodeDefinition::default()),
    }
}

/// Returns batch parameters based on command-line arguments.
fn batch_params_from_matches(matches: &ArgMatches) -> batch::BatchParams {
    // OK to unwrap: These arguments have default values.
    batch::BatchParams {
        num_symbols_per_block: *matches.get_one("num_symbols_per_block").unwrap(),
        num_blocks: *matches.get_one("num_blocks").unwrap(),
    }
}

/// Returns name of JSON file to which results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}
