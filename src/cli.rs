//! Command-line interface.

use clap::{Parser, Subcommand};

use docwatch_entity::Category;

/// DocWatch: document expiry notification service
#[derive(Debug, Parser)]
#[command(name = "docwatch", version, about)]
pub struct Cli {
    /// Configuration overlay to load from `config/<env>.toml`
    #[arg(long, env = "DOCWATCH_ENV", default_value = "development", global = true)]
    pub env: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands. `serve` is the default.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the scheduler and HTTP API until interrupted
    Serve,
    /// Run one scan for a category now and print the run summary as JSON
    Scan {
        /// client, employee, or company
        category: Category,
    },
}

impl Cli {
    /// The command to run, defaulting to `serve`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["docwatch"]).unwrap();
        assert!(matches!(cli.command(), Command::Serve));
    }

    #[test]
    fn test_scan_parses_category() {
        let cli = Cli::try_parse_from(["docwatch", "--env", "production", "scan", "Company"]).unwrap();
        assert_eq!(cli.env, "production");
        assert!(matches!(
            cli.command(),
            Command::Scan {
                category: Category::Company
            }
        ));
    }

    #[test]
    fn test_scan_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["docwatch", "scan", "bogus"]).is_err());
    }
}
