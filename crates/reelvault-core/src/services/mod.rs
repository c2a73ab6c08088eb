//! Domain services composed from ports.

mod accounts;
mod credentials;
mod movies;

pub use accounts::AccountService;
pub use credentials::CredentialVerifier;
pub use movies::MovieService;
