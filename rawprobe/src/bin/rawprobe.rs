use std::{
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use rawprobe::{
    probe::{
        DEFAULT_MODE,
        DEFAULT_PATH,
    },
    Logger,
    Probe,
    ProbeError,
};

/// Open, write and fstat a file through raw system calls and print what the kernel returned
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The file to create or open
    #[arg(long, default_value = DEFAULT_PATH)]
    path: PathBuf,

    /// The text that gets written into the file
    #[arg(long, default_value = "Hello world")]
    payload: String,

    /// Permission bits in octal, used if the file gets created
    #[arg(long, value_parser = parse_mode, default_value = "644")]
    mode: u32,

    /// Stop at the first failing syscall and exit with an error
    #[arg(long)]
    abort_on_error: bool,

    /// Close the file descriptor before exiting instead of leaving it to the kernel
    #[arg(long)]
    close: bool,
}

fn parse_mode(s: &str) -> Result<u32, String> {
    let mode = u32::from_str_radix(s.trim_start_matches("0o"), 8).map_err(|e| format!("not an octal mode: {}", e))?;

    if mode > 0o7777 {
        return Err(format!("mode {:o} has bits outside of 0o7777", mode));
    }

    Ok(mode)
}

fn probe(args: Args, logger: &mut Logger) -> Result<(), ProbeError> {
    let probe = Probe::builder()
        .path(args.path)
        .payload(args.payload)
        .mode(args.mode)
        .continue_on_error(!args.abort_on_error)
        .leak_handle(!args.close)
        .build()?;

    let report = probe.run(&mut std::io::stdout().lock(), logger)?;

    if !report.is_ok() {
        logger.debug("Finished with errors");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut logger = Logger::spinner();

    if args.mode != DEFAULT_MODE {
        logger.debug(format!("Using mode {:o}", args.mode));
    }

    match probe(args, &mut logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger.error(err.to_string());
            ExitCode::FAILURE
        },
    }
}
