//! # Xinde Sign
//!
//! Request signing for the Xinde identity-verification API.
//!
//! Every request sent to the service carries a `signature` query parameter
//! computed from the other query parameters and the application secret.
//! This crate implements that computation and has no networking dependencies.
//!
//! ## Algorithm
//!
//! - Parse the query string into key/value pairs, sorted ascending by key
//! - Build `secret + k1 + v1 + k2 + v2 + ... + secret`
//! - Hash it with SHA-1 and encode the digest as lowercase hex
//! - Append `&signature=<hex>` to the original URL
//!
//! ## Usage
//!
//! ```
//! use xinde_sign::sign_url;
//!
//! fn main() -> Result<(), xinde_sign::SignError> {
//!     let signed = sign_url(
//!         "https://api.xindedata.com/v1/task?appid=myappid&time=1467372594",
//!         "mySecret",
//!     )?;
//!
//!     assert!(signed.as_str().ends_with(signed.signature().as_str()));
//!     println!("{}", signed);
//!     Ok(())
//! }
//! ```

mod error;
mod params;
mod signer;

pub use error::SignError;
pub use params::QueryParams;
pub use signer::{signature, sign_url, verify_signed_url, Signature, SignedUrl, SIGNATURE_PARAM};
