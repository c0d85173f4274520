//! Security module for Praias - outbound request signing.
//!
//! Provides:
//! - **SigV4**: AWS Signature Version 4 signing for the Bedrock model and
//!   knowledge-base endpoints
//! - **Credentials**: static access-key credentials with redacted `Debug`

pub mod sigv4;

pub use sigv4::{Credentials, SignableRequest, SigningScope, sign, uri_encode};
