mod cli;

use std::fs;
use std::process;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // No argument is a hint request, not a failure.
    let Some(source) = cli.source else {
        eprintln!("usage: nscss <source> [-o <path>]");
        return;
    };

    let css = match nscss_core::compile(&source) {
        Ok(css) => css,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(err) = fs::write(&path, css) {
                eprintln!("failed to write {path}: {err}");
                process::exit(1);
            }
        }
        None => print!("{css}"),
    }
}
