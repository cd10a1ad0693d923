use std::process;

use clap::Parser;

use polygen::{generate, Cli};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version are not configuration errors.
            if e.use_stderr() {
                eprint!("{}", e);
                process::exit(13);
            }
            print!("{}", e);
            process::exit(0);
        }
    };

    let settings = match cli.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration error: {:#}", e);
            process::exit(14);
        }
    };

    if let Err(e) = generate(&settings) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
