//! # Claimgate CLI
//!
//! Command-line front end for `claimgate-auth`: issue HS256 bearer tokens,
//! verify them into identities, and inspect their claims.
//!
//! ## Usage
//!
//! ```bash
//! # Issue a token with the configured default roles
//! CLAIMGATE_SIGN_KEY=... claimgate issue alice
//!
//! # Issue with explicit roles and a 5 minute lifetime
//! claimgate issue alice --role Admin --role Auditor --lifetime 5
//!
//! # Verify, enforcing exp/nbf, and require a role
//! claimgate verify "$TOKEN" --enforce-lifetime --role Admin
//!
//! # Dump the verified claim set as JSON
//! echo "$TOKEN" | claimgate --format json decode -
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod settings;

use std::io::Write;

pub use cli::{Cli, Commands, OutputFormat};
pub use commands::VerifyOptions;
pub use error::{CliError, CliResult};

/// Run a parsed command, writing its output to `out`
///
/// # Errors
///
/// Returns the first error from settings loading or the command itself.
pub fn run(cli: Cli, out: &mut impl Write) -> CliResult<()> {
    let settings = settings::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Issue {
            username,
            roles,
            lifetime,
        } => commands::issue(settings, &username, &roles, lifetime, out),
        Commands::Verify {
            token,
            enforce_lifetime,
            leeway,
            role,
        } => {
            let token = commands::read_token(&token)?;
            let options = VerifyOptions {
                enforce_lifetime,
                leeway_seconds: leeway,
                required_role: role,
            };
            commands::verify(settings, &token, &options, cli.format, out)
        }
        Commands::Decode { token } => {
            let token = commands::read_token(&token)?;
            commands::decode(settings, &token, cli.format, out)
        }
    }
}
