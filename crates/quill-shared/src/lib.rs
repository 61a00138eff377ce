//! # Quill Shared
//!
//! Wire types shared between the server and Rust clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, InvalidParam};
