use clap::Parser;
use huffcode::cli::{Cli, run};

fn main() {
    let cli = Cli::parse();
    huffcode::logging::init(cli.verbosity());

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
