//! Command implementations

pub mod accounts;
pub mod activate;
pub mod config;
pub mod status;
pub mod version;
