//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Representation, charsets, colors, resources, settings)
//! - `controllers/` - Orchestration (SyncedContentSession, ColorPicker)
//! - `services/` - Business operations (text loading, status text helpers)
//! - `infrastructure/` - External integrations (prompts, status reporting, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::color_picker::ColorPicker;
pub use controllers::session::{CloseOutcome, SyncedContentSession};
pub use domain::{
    ByteSource, ByteSurface, CharsetGuess, ChannelOrder, EditorSettings, FileSink, FileSource,
    HsbColor, MemoryByteSurface, MemorySource, MemoryTextSurface, Representation, ResourceHandle,
    RgbColor, SessionEvent, SingleByteCharset, SizeLimits, TextSurface, WriteSink,
};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::prompt::{CloseChoice, ConsolePrompt, Prompt};
pub use infrastructure::status::{LogStatus, StatusLevel, StatusReporter};
