use clap::Parser;
use claimgate_cli::{Cli, CliError};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_tracing();

    let stdout = std::io::stdout();
    claimgate_cli::run(cli, &mut stdout.lock()).map_err(with_hints)
}

/// Append resolution hints to the error message
fn with_hints(error: CliError) -> anyhow::Error {
    let message = error
        .suggestions()
        .into_iter()
        .fold(error.to_string(), |acc, hint| format!("{acc}\n  hint: {hint}"));
    anyhow::anyhow!(message)
}
