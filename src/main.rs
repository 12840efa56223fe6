use std::{path::PathBuf, process};

use cflat::{CflatError, Interpreter};
use clap::Parser;

/// cflat runs C-flat scripts: `cflat [path]`.
///
/// With no path it runs ./cflatexe/main.cflat, next to the ./cflatexe
/// directory that `import` statements resolve against.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The .cflat script to execute.
    script: Vec<String>,
}

fn main() {
    let args = Args::parse();

    if args.script.len() > 1 {
        println!("Usage: cflat [path]");
        process::exit(64);
    }

    let path = args.script
                   .first()
                   .map_or_else(|| PathBuf::from("./cflatexe/main.cflat"), PathBuf::from);

    let mut interpreter = Interpreter::new();
    match interpreter.run_file(&path) {
        Ok(()) => {},

        // Diagnostics were already the whole story; parse failures skip
        // execution but leave the exit status clean.
        Err(error @ CflatError::Syntax(_)) => eprintln!("{error}"),

        Err(error) => {
            eprintln!("{error}");
            process::exit(1);
        },
    }
}
