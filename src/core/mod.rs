//! Core library components.
//!
//! The secrets pipeline: configuration, the API client, response
//! classification and decryption, template reconciliation and the env
//! file writer.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod extract;
pub mod fetch;
pub mod pull;
pub mod template;
pub mod types;
