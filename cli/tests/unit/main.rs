//! Unit tests for valctl
//!
//! These tests run against the library without spawning wallet commands.

mod architecture;
mod property_tests;
