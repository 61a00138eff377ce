//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains the entities, the slug generator, the error taxonomy,
//! the ports infrastructure must implement, and the services that validate
//! input and drive those ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldError, RepoError};
