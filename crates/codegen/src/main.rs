//! opdefgen CLI
//!
//! Command-line interface for generating shared C++ verifier routines
//! from op definition schema files.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "opdefgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate shared verifier routines from op definition schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate verifier routines from a schema file
    Generate {
        /// Input schema file (TOML)
        input: PathBuf,

        /// Output file path (defaults to the input with a .cpp.inc extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tag distinguishing independent outputs generated from the same schema
        #[arg(long, default_value = "")]
        tag: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output, tag } => {
            let output = output.unwrap_or_else(|| input.with_extension("cpp.inc"));
            match opdefgen::generate_file(&input, &output, &tag) {
                Ok(()) => {
                    println!("Generated {} -> {}", input.display(), output.display());
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "opdefgen", &mut io::stdout());
        }
    }
}
