mod commands;
mod logger;

use clap::{Parser, Subcommand};
use commands::ConfigArgs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "ipcgen")]
#[command(about = "Generate IPC service dispatch tables", long_about = None)]
struct Cli {
    /// Show debug logs (exclusions and rules)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the service dispatch function
    Generate {
        /// Source directory to scan (default: src)
        #[arg(long, default_value = "src")]
        src: String,

        /// Output file path (default: <src>/ipc_dispatch.rs)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Fail if the output file is out of date instead of writing it
        #[arg(long, conflicts_with = "watch")]
        check: bool,

        /// Watch for changes and regenerate
        #[arg(long, short = 'w')]
        watch: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the dispatch table
    List {
        /// Source directory to scan (default: src)
        #[arg(long, default_value = "src")]
        src: String,

        /// Also print excluded types and the reason
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() {
    ipcgen::config::load_dotenv(Path::new("."));
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Generate {
            src,
            output,
            check,
            watch,
            config,
        } => {
            commands::generate::run(src, output, check, watch, config);
        }
        Commands::List { src, all, config } => {
            commands::list::run(src, all, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "ipcgen",
            "generate",
            "--src",
            "host/src",
            "--check",
            "--function-name",
            "lookup",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                src, check, config, ..
            } => {
                assert_eq!(src, "host/src");
                assert!(check);
                assert_eq!(config.function_name.as_deref(), Some("lookup"));
            }
            Commands::List { .. } => panic!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn test_check_conflicts_with_watch() {
        assert!(Cli::try_parse_from(["ipcgen", "generate", "--check", "--watch"]).is_err());
    }
}
