//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with the user and the host:
//! - Confirmation prompts
//! - Status reporting
//! - Error types

pub mod error;
pub mod prompt;
pub mod status;
