use clap::Parser;
use ethrecover::cli::CLI;

fn main() -> eyre::Result<()> {
    let CLI { opts, command } = CLI::parse();
    command.run(&opts)
}
