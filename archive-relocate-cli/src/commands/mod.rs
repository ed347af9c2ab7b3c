//! CLI command implementations.
//!
//! - [`relocate`] - Upload one archive under its templated name
//! - [`resolve`] - Show the components and target of a source path
//! - [`init`] - Write a default configuration file

pub mod init;
pub mod relocate;
pub mod resolve;
