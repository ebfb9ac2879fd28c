use clap::Parser;

use noc_cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    noc_cli::run(cli)
}
