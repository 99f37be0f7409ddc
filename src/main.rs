use anyhow::{Result, anyhow};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use xrate::cli::best_rate::parse_request;
use xrate::core::ConversionRequest;
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConversionArgs {
    /// Source currency code, e.g. USD
    #[arg(long)]
    from: String,

    /// Target currency code, e.g. EUR
    #[arg(long)]
    to: String,

    /// Amount to convert
    #[arg(long, allow_hyphen_values = true)]
    amount: Decimal,
}

impl From<ConversionArgs> for ConversionRequest {
    fn from(args: ConversionArgs) -> ConversionRequest {
        ConversionRequest::new(&args.from, &args.to, args.amount)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup {
        /// Print the example configuration instead of writing it
        #[arg(long)]
        print: bool,
    },
    /// Find the best rate across all providers
    BestRate {
        /// Source currency code, e.g. USD
        #[arg(long, required_unless_present = "json")]
        from: Option<String>,

        /// Target currency code, e.g. EUR
        #[arg(long, required_unless_present = "json")]
        to: Option<String>,

        /// Amount to convert
        #[arg(long, required_unless_present = "json", allow_hyphen_values = true)]
        amount: Option<Decimal>,

        /// Full request as JSON, e.g. '{"sourceCurrency":"USD","targetCurrency":"EUR","amount":100}'
        #[arg(long, conflicts_with_all = ["from", "to", "amount"])]
        json: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        raw: bool,
    },
    /// Show every provider's rate side by side
    Compare {
        #[command(flatten)]
        conversion: ConversionArgs,
    },
}

impl TryFrom<Commands> for xrate::AppCommand {
    type Error = anyhow::Error;

    fn try_from(cmd: Commands) -> Result<xrate::AppCommand> {
        match cmd {
            Commands::BestRate {
                from,
                to,
                amount,
                json,
                raw,
            } => {
                let request = match (json, from, to, amount) {
                    (Some(json), ..) => parse_request(&json)?,
                    (None, Some(from), Some(to), Some(amount)) => {
                        Some(ConversionRequest::new(&from, &to, amount))
                    }
                    _ => {
                        return Err(anyhow!(
                            "Either --json or --from, --to and --amount are required"
                        ));
                    }
                };
                Ok(xrate::AppCommand::BestRate { request, raw })
            }
            Commands::Compare { conversion } => Ok(xrate::AppCommand::Compare {
                request: conversion.into(),
            }),
            Commands::Setup { .. } => {
                Err(anyhow!("Setup command should be handled separately"))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup { print: true }) => {
            print!("{}", xrate::cli::setup::example_config());
            Ok(())
        }
        Some(Commands::Setup { print: false }) => xrate::cli::setup::setup().map(|path| {
            println!("Created configuration at {}", path.display());
        }),
        Some(cmd) => match xrate::AppCommand::try_from(cmd) {
            Ok(command) => xrate::run_command(command, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_best_rate_from_flags() {
        let cli = Cli::parse_from([
            "xrate", "best-rate", "--from", "USD", "--to", "EUR", "--amount", "-5",
        ]);
        let command = xrate::AppCommand::try_from(cli.command.unwrap()).unwrap();
        let xrate::AppCommand::BestRate { request, raw } = command else {
            panic!("Expected best-rate command");
        };
        assert!(!raw);
        assert_eq!(request, Some(ConversionRequest::new("USD", "EUR", dec!(-5))));
    }

    #[test]
    fn test_best_rate_from_null_json() {
        let cli = Cli::parse_from(["xrate", "best-rate", "--json", "null", "--raw"]);
        let command = xrate::AppCommand::try_from(cli.command.unwrap()).unwrap();
        let xrate::AppCommand::BestRate { request, raw } = command else {
            panic!("Expected best-rate command");
        };
        assert!(raw);
        assert!(request.is_none());
    }

    #[test]
    fn test_setup_print_flag() {
        let cli = Cli::parse_from(["xrate", "setup", "--print"]);
        assert!(matches!(cli.command, Some(Commands::Setup { print: true })));
        assert!(xrate::AppCommand::try_from(Commands::Setup { print: false }).is_err());
    }

    #[test]
    fn test_best_rate_requires_input() {
        assert!(Cli::try_parse_from(["xrate", "best-rate", "--from", "USD"]).is_err());
        assert!(
            Cli::try_parse_from(["xrate", "best-rate", "--json", "null", "--from", "USD"]).is_err()
        );
    }
}
