//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory database fixtures
//! - A running test server around the real router
//! - Authentication test helpers
//! - Custom assertion macros

#![allow(dead_code)]

#[macro_use]
pub mod assertions;
pub mod app;
pub mod auth_helpers;
pub mod database;

// Re-export commonly used utilities
pub use app::*;
pub use auth_helpers::*;
pub use database::*;
