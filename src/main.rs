use clap::Parser;
use miette::Result;
use sloth::cli::{Cli, Commands};
use sloth::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => sloth::cli::generate::run(args, &printer)?,
        Commands::ExampleConfig => sloth::cli::example::run()?,
        Commands::Completions(args) => sloth::cli::completions::run(args)?,
    }

    Ok(())
}
