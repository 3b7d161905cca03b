use clap::Parser;

fn main() -> anyhow::Result<()> {
    dinesearch_cli::run(dinesearch_cli::Args::parse())
}
