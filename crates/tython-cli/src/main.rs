use clap::Parser;
use tython_cli::{cli::Cli, logger, run};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    match run::run(&cli) {
        Ok(report) => std::process::exit(report.exit_code()),
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}
