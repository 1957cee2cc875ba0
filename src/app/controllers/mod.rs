//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the host UI:
//! - The synchronized text/raw edit session
//! - Color picker state

pub mod color_picker;
pub mod session;
