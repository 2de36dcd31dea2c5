//! Command handlers for the enumgen CLI.

pub mod generate;
pub mod init;
pub mod inspect;
