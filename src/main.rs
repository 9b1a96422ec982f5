extern crate rls;

use std::io::{self, Write};
use std::process;

use rls::cli;
use rls::error::{self, ErrorReporter};
use rls::fs;

fn main() {
    let opts = cli::parse_cli();
    let mut reporter = ErrorReporter::new();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in &opts.paths {
        if let Err(e) = fs::list_path(&mut out, path, &opts, &mut reporter) {
            eprintln!("{}: write error: {}", error::PROG_NAME, e);
            process::exit(1);
        }
    }

    if let Err(e) = out.flush() {
        eprintln!("{}: write error: {}", error::PROG_NAME, e);
        process::exit(1);
    }

    process::exit(reporter.exit_code());
}
