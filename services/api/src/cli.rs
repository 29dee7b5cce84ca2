use crate::demo::{
    run_demo, run_options, run_recommend, run_validate, DemoArgs, OptionsArgs, RecommendArgs,
    ValidateArgs,
};
use crate::infra::RulesArgs;
use crate::server;
use clap::{Args, Parser, Subcommand};
use sourcing_rules::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sourcing Rules Engine",
    about = "Resolve sourcing event recommendations from sector, category, client and department rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the recommendation for one selection
    Recommend(RecommendArgs),
    /// List the sectors, categories, clients and departments on offer
    Options(OptionsArgs),
    /// Check reference tables for data-quality issues
    Validate(ValidateArgs),
    /// Walk through the reference scenarios against the active tables
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) rules: RulesArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Options(args) => run_options(args),
        Command::Validate(args) => run_validate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["sourcing-rules-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn recommend_accepts_selection_flags() {
        let cli = Cli::try_parse_from([
            "sourcing-rules-api",
            "recommend",
            "--sector",
            "industria",
            "--client",
            "petrobras",
            "--today",
            "2025-03-10",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Recommend(args)) => {
                assert_eq!(args.sector.as_deref(), Some("industria"));
                assert_eq!(args.client.as_deref(), Some("petrobras"));
                assert!(args.json);
                assert!(args.today.is_some());
            }
            other => panic!("expected recommend command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from([
            "sourcing-rules-api",
            "recommend",
            "--sector",
            "industria",
            "--today",
            "tomorrow",
        ])
        .is_err());
    }
}
