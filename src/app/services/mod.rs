//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Background text loading
//! - Text operations (file names, status bar text)

pub mod text_loader;
pub mod text_ops;
