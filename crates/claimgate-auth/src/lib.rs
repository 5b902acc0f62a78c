//! # Claimgate Auth - HS256 Bearer Tokens and Claims Identities
//!
//! Issues and verifies HMAC-SHA256 signed JSON Web Tokens, turns a verified
//! payload into a claims-based identity, and answers role and claim queries
//! against it.
//!
//! ## Design Principles
//!
//! - **Authenticity first**: the codec only decides whether bytes are genuine;
//!   lifetime and issuer checks are separate and opt-in
//! - **Fresh identities**: every verification builds a new identity that lives
//!   as long as the request using it
//! - **Explicit configuration**: settings are passed in, never read from globals
//!
//! ## Architecture
//!
//! - [`claims`] - Claim model (`Claim`, `ClaimValue`, ordered `ClaimSet`)
//! - [`jwt`] - Compact JWS codec, token issuance, lifetime validation
//! - [`identity`] - `ClaimsIdentity` and the payload-to-identity builder
//! - [`authorization`] - Role/claim predicates and declarative policies
//! - [`ticket`] - `ClaimsPrincipal` and `AuthenticationTicket`
//! - [`authenticator`] - `JwtAuthenticator`, the settings-bound entry point
//! - [`challenge`] - Bearer header parsing and `WWW-Authenticate` challenges
//! - [`config`] - `JwtSettings`
//! - [`error`] - `AuthError`
//!
//! ## Quick Start
//!
//! ```rust
//! use claimgate_auth::{JwtAuthenticator, JwtSettings};
//!
//! let settings = JwtSettings::new("JwtAuthDemo", "0123456789abcdef0123456789abcdef")
//!     .with_authentication_scheme_included(true);
//! let auth = JwtAuthenticator::new(settings)?;
//!
//! let token = auth.issue_token("alice")?;
//! let ticket = auth.authenticate_header(&format!("Bearer {token}"))?;
//!
//! let principal = ticket.principal();
//! assert!(principal.is_authenticated());
//! assert!(principal.has_role("Admin"));
//! assert!(!principal.has_role("Guest"));
//! assert_eq!(principal.name(), Some("alice"));
//! # Ok::<(), claimgate_auth::AuthError>(())
//! ```
//!
//! ## Standards Compliance
//!
//! - **RFC 7515** - JSON Web Signature (compact serialization)
//! - **RFC 7518** - HS256
//! - **RFC 7519** - JSON Web Token
//! - **RFC 6750** - Bearer token usage and challenges

pub mod authenticator;
pub mod authorization;
pub mod challenge;
pub mod claims;
pub mod config;
pub mod error;
pub mod identity;
pub mod jwt;
pub mod ticket;

#[doc(inline)]
pub use authenticator::JwtAuthenticator;

#[doc(inline)]
pub use authorization::{Policy, Requirement};

#[doc(inline)]
pub use challenge::{BearerError, Challenge, extract_bearer};

#[doc(inline)]
pub use claims::{Claim, ClaimSet, ClaimValue, claim_types};

#[doc(inline)]
pub use config::JwtSettings;

#[doc(inline)]
pub use error::{AuthError, Result};

#[doc(inline)]
pub use identity::{ClaimsIdentity, IdentityBuilder};

#[doc(inline)]
pub use jwt::ValidationConfig;

#[doc(inline)]
pub use ticket::{AuthenticationProperties, AuthenticationTicket, ClaimsPrincipal};
