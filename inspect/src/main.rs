//! Inspect hxbit (HXS) files.

use clap::{Arg, ArgAction, Command};
use hxs_format::{shims, Config, File};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use thiserror::Error;
use tracing::{debug, info};

mod print;

/// Returns the version of the crate.
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

const PATH_ARG: &str = "path";
const SHIMS_FLAG: &str = "shims";
const DEBUG_FLAG: &str = "debug";
const TRACE_FLAG: &str = "trace";
const VERIFY_FLAG: &str = "verify";
const MAX_DEPTH_FLAG: &str = "max-depth";

#[derive(Debug, Error)]
enum Error {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, io::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] hxs_format::Error),
    #[error("re-encoded file differs at byte {offset:#x} ({original} bytes in, {encoded} bytes out)")]
    Mismatch {
        offset: usize,
        original: usize,
        encoded: usize,
    },
}

fn main() -> ExitCode {
    let matches = Command::new("hxs-inspect")
        .version(crate_version())
        .about("Decode an hxbit-serialized file and print its classes, schemas and objects.")
        .arg(
            Arg::new(PATH_ARG)
                .required(true)
                .help("Path to the hxbit-serialized data")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(SHIMS_FLAG)
                .short('s')
                .long(SHIMS_FLAG)
                .default_value("deadcells")
                .help("Type shim library listing field layouts the file may not describe")
                .value_parser(clap::builder::PossibleValuesParser::new(shims::LIBRARIES)),
        )
        .arg(
            Arg::new(DEBUG_FLAG)
                .short('d')
                .long(DEBUG_FLAG)
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(TRACE_FLAG)
                .long(TRACE_FLAG)
                .help("Log every type and value as it is decoded")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(VERIFY_FLAG)
                .long(VERIFY_FLAG)
                .help("Re-encode the file and check it matches the input byte for byte")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(MAX_DEPTH_FLAG)
                .long(MAX_DEPTH_FLAG)
                .help("Maximum nesting of types and values")
                .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..)),
        )
        .get_matches();

    // Create logger
    let level = if matches.get_flag(TRACE_FLAG) {
        tracing::Level::TRACE
    } else if matches.get_flag(DEBUG_FLAG) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut cfg = Config::default();
    if let Some(max_depth) = matches.get_one::<usize>(MAX_DEPTH_FLAG) {
        cfg.max_depth = *max_depth;
    }
    let Some(path) = matches.get_one::<PathBuf>(PATH_ARG) else {
        return ExitCode::FAILURE;
    };
    let library = matches
        .get_one::<String>(SHIMS_FLAG)
        .map_or("deadcells", String::as_str);

    match run(path, library, &cfg, matches.get_flag(VERIFY_FLAG)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, library: &str, cfg: &Config, verify: bool) -> Result<(), Error> {
    let shims = shims::library(library)?;
    let data = std::fs::read(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;
    debug!(path = %path.display(), len = data.len(), "read file");

    let file = File::decode_cfg(&data[..], cfg)?;
    info!(
        classes = file.header.classes.len(),
        schemas = file.header.schemas.len(),
        objects = file.objects.len(),
        "decoded"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print::classes(&mut out, &file)?;
    print::schemas(&mut out, &file)?;
    print::shims(&mut out, &file, &shims)?;
    print::root(&mut out, &file)?;
    out.flush()?;

    if verify {
        compare(&data, &file.encode()?)?;
        info!("re-encoded file matches");
    }
    Ok(())
}

/// Checks that `encoded` reproduces `original`.
fn compare(original: &[u8], encoded: &[u8]) -> Result<(), Error> {
    if original == encoded {
        return Ok(());
    }
    let offset = original
        .iter()
        .zip(encoded)
        .position(|(a, b)| a != b)
        .unwrap_or(original.len().min(encoded.len()));
    Err(Error::Mismatch {
        offset,
        original: original.len(),
        encoded: encoded.len(),
    })
}
