//! CLI command implementations.

pub mod export;
pub mod import;
pub mod inspect;
pub mod push;
pub mod status;
