#![deny(unsafe_code)]

use std::{env, io, process::ExitCode};

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    streamdelta::cli::run_with(env::args_os(), &mut stdout, &mut stderr)
}
