//! Argus command-line interface.

mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, rules::RulesArgs};

#[derive(Parser, Debug)]
#[command(name = "argus", version, about = "TypeScript/JavaScript static analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a file or directory and report issues
    Check(CheckArgs),
    /// List the rule catalog
    Rules(RulesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check(args) => args.run()?,
        Commands::Rules(args) => {
            args.run();
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
