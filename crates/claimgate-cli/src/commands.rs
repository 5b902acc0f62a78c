//! Command implementations
//!
//! Each command takes loaded settings and writes its result to `out`; nothing
//! here touches process-global state.

use std::io::{self, Read, Write};

use claimgate_auth::{
    AuthenticationProperties, Claim, ClaimSet, ClaimValue, JwtAuthenticator, JwtSettings,
    ValidationConfig,
};
use serde::Serialize;
use tracing::info;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Identity report printed by `verify`
#[derive(Debug, Serialize)]
pub struct IdentityReport<'a> {
    /// Scheme the ticket was issued for
    pub scheme: &'a str,
    /// Whether the identity is tagged with the scheme
    pub authenticated: bool,
    /// Principal name
    pub name: Option<&'a str>,
    /// Role values
    pub roles: Vec<&'a str>,
    /// All identity claims in order
    pub claims: &'a [Claim],
    /// Token `iat`/`exp` and `jti`, read from the claim set
    pub properties: AuthenticationProperties,
}

/// Issue a token and print it
///
/// # Errors
///
/// Fails if the settings are unusable.
pub fn issue(
    mut settings: JwtSettings,
    username: &str,
    roles: &[String],
    lifetime: Option<u32>,
    out: &mut impl Write,
) -> CliResult<()> {
    if let Some(minutes) = lifetime {
        settings = settings.with_token_lifetime_minutes(minutes);
    }
    let auth = JwtAuthenticator::new(settings)?;

    let token = if roles.is_empty() {
        auth.issue_token(username)?
    } else {
        auth.issue_token_with_roles(username, roles.iter().map(String::as_str))?
    };

    info!(username, "Issued token");
    writeln!(out, "{token}")?;
    Ok(())
}

/// Options for [`verify`]
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Reject expired and not-yet-valid tokens
    pub enforce_lifetime: bool,
    /// Clock skew tolerance in seconds
    pub leeway_seconds: u64,
    /// Role the identity must hold
    pub required_role: Option<String>,
}

/// Verify a token and print the identity
///
/// # Errors
///
/// Fails on any verification error, or with [`CliError::RoleMissing`] when
/// the required role is absent.
pub fn verify(
    mut settings: JwtSettings,
    token: &str,
    options: &VerifyOptions,
    format: OutputFormat,
    out: &mut impl Write,
) -> CliResult<()> {
    if options.enforce_lifetime {
        settings.validation = ValidationConfig {
            validate_exp: true,
            validate_nbf: true,
            leeway_seconds: options.leeway_seconds,
            ..settings.validation
        };
    }
    let auth = JwtAuthenticator::new(settings)?;
    let claims = auth.decode(token)?;
    let ticket = auth.ticket_for(&claims);
    let mut properties =
        AuthenticationProperties::from_timestamps(claims.issued_at(), claims.expires_at());
    if let Some(jti) = claims.jwt_id() {
        properties = properties.with_item("jti", jti);
    }
    let principal = ticket.principal();
    let identity = principal.identity();

    let report = IdentityReport {
        scheme: ticket.authentication_scheme(),
        authenticated: identity.is_authenticated(),
        name: identity.name(),
        roles: identity.roles(),
        claims: identity.claims(),
        properties,
    };

    match format {
        OutputFormat::Human => {
            writeln!(out, "scheme: {}", report.scheme)?;
            writeln!(out, "authenticated: {}", report.authenticated)?;
            writeln!(out, "name: {}", report.name.unwrap_or("-"))?;
            writeln!(out, "roles: {}", report.roles.join(", "))?;
            if let Some(expires) = report.properties.expires_utc {
                writeln!(out, "expires: {}", expires.to_rfc3339())?;
            }
            writeln!(out, "claims:")?;
            for claim in report.claims {
                writeln!(out, "  {claim}")?;
            }
        }
        _ => write_json(&report, format, out)?,
    }

    if let Some(ref role) = options.required_role
        && !principal.has_role(role)
    {
        return Err(CliError::RoleMissing {
            role: role.clone(),
            principal: principal.name().unwrap_or("<anonymous>").to_string(),
        });
    }
    Ok(())
}

/// Verify a token and print its claim set
///
/// # Errors
///
/// Fails on any verification error.
pub fn decode(
    settings: JwtSettings,
    token: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> CliResult<()> {
    let auth = JwtAuthenticator::new(settings)?;
    let claims = auth.decode(token)?;

    match format {
        OutputFormat::Human => write_claim_lines(&claims, out),
        _ => write_json(&claims, format, out),
    }
}

fn write_claim_lines(claims: &ClaimSet, out: &mut impl Write) -> CliResult<()> {
    for (claim_type, value) in claims.iter() {
        match value {
            ClaimValue::Scalar(s) => writeln!(out, "{claim_type}: {s}")?,
            ClaimValue::Sequence(values) => writeln!(out, "{claim_type}: [{}]", values.join(", "))?,
            ClaimValue::NumericDate(n) => writeln!(out, "{claim_type}: {n}")?,
            ClaimValue::Other(v) => writeln!(out, "{claim_type}: {v}")?,
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(value: &T, format: OutputFormat, out: &mut impl Write) -> CliResult<()> {
    if format == OutputFormat::Compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Resolve a token argument, reading stdin for `-`
///
/// # Errors
///
/// Fails if stdin cannot be read.
pub fn read_token(arg: &str) -> CliResult<String> {
    if arg == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf.trim().to_string())
    } else {
        Ok(arg.trim().to_string())
    }
}
