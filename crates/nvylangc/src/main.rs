use clap::Parser;
use nvylangc::{init_logging, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        let err = anyhow::Error::from(err);
        eprintln!("error: {err:?}");
        std::process::exit(-1);
    }
}
