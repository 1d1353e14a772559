pub mod completions;
pub mod example;
pub mod generate;

use clap::{Parser, Subcommand};

/// sloth - Shader generator for texture source directories
#[derive(Parser, Debug)]
#[command(name = "sloth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a shader file from texture source directories
    Generate(generate::GenerateArgs),

    /// Print an example per-directory/per-shader options file
    ExampleConfig,

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
