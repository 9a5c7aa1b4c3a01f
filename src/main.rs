use std::process;

use clap::Parser;

use semtypes::cli::Args;

fn main() {
    let args = Args::parse();
    match semtypes::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(3);
        }
    }
}
