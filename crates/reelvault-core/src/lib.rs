//! # ReelVault Core
//!
//! The domain layer of ReelVault: users, their movie collections, and the
//! rules that keep every collection private to its owner.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
