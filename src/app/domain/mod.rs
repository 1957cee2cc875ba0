//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Representations and the session event type
//! - Charset detection and conversion
//! - RGB/HSB color math
//! - Resources, byte sources and write sinks
//! - Editing surface contracts
//! - Editor settings

pub mod charset;
pub mod color;
pub mod messages;
pub mod representation;
pub mod resource;
pub mod settings;
pub mod surface;

pub use charset::{CharsetGuess, SingleByteCharset};
pub use color::{ChannelOrder, HsbColor, RgbColor};
pub use messages::SessionEvent;
pub use representation::Representation;
pub use resource::{ByteSource, FileSink, FileSource, MemorySource, ResourceHandle, WriteSink};
pub use settings::{EditorSettings, SizeLimits};
pub use surface::{ByteSurface, MemoryByteSurface, MemoryTextSurface, TextSurface};
