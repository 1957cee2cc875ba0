use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::infrastructure::error::Result;
use crate::app::services::text_ops::extract_filename;

/// Where a resource's bytes come from.
///
/// Implementations are shared with the text loader thread, hence
/// `Send + Sync`.
pub trait ByteSource: Send + Sync {
    fn read_all(&self) -> io::Result<Vec<u8>>;

    /// Length in bytes, if known without reading.
    fn size_hint(&self) -> Option<u64>;
}

/// Destination for a committed resource.
pub trait WriteSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Human readable destination, used in the "save changes?" prompt.
    fn location(&self) -> String;
}

pub struct FileSource {
    path: PathBuf,
    len: Option<u64>,
}

impl FileSource {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let len = fs::metadata(&path)?.len();
        Ok(Self { path, len: Some(len) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn read_all(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn size_hint(&self) -> Option<u64> {
        self.len
    }
}

pub struct MemorySource {
    data: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    fn read_all(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.to_vec())
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WriteSink for FileSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        // Override folders may not exist yet
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, bytes)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl WriteSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.clear();
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn location(&self) -> String {
        "memory buffer".to_string()
    }
}

/// An opened resource entry: a name, a size known up front, and the source
/// its bytes are read from.
#[derive(Clone)]
pub struct ResourceHandle {
    name: String,
    size: u64,
    source: Arc<dyn ByteSource>,
}

impl ResourceHandle {
    /// Unknown sizes are recorded as 0, which never trips a size limit.
    pub fn new(name: impl Into<String>, source: Arc<dyn ByteSource>) -> Self {
        let size = source.size_hint().unwrap_or(0);
        Self {
            name: name.into(),
            size,
            source,
        }
    }

    pub fn open_file(path: &str) -> Result<Self> {
        let source = FileSource::open(path)?;
        Ok(Self::new(extract_filename(path), Arc::new(source)))
    }

    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::new(name, Arc::new(MemorySource::new(data)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source(&self) -> Arc<dyn ByteSource> {
        Arc::clone(&self.source)
    }

    pub fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.source.read_all()?)
    }
}

impl std::fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::error::AppError;

    struct UnsizedSource;

    impl ByteSource for UnsizedSource {
        fn read_all(&self) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
        }

        fn size_hint(&self) -> Option<u64> {
            None
        }
    }

    #[test]
    fn test_file_resource_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AR0100.BMP");
        fs::write(&path, [1u8, 2, 3, 4]).unwrap();

        let handle = ResourceHandle::open_file(path.to_str().unwrap()).unwrap();
        assert_eq!(handle.name(), "AR0100.BMP");
        assert_eq!(handle.size(), 4);
        assert_eq!(handle.read_all().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let err = ResourceHandle::open_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_unknown_size_is_zero() {
        let handle = ResourceHandle::new("stream", Arc::new(UnsizedSource));
        assert_eq!(handle.size(), 0);
        assert!(matches!(handle.read_all(), Err(AppError::Io(_))));
    }

    #[test]
    fn test_file_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override").join("X.DAT");
        let mut sink = FileSink::new(&path);
        sink.write(b"data").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(sink.location().ends_with("X.DAT"));
    }

    #[test]
    fn test_vec_sink_replaces_contents() {
        let mut sink: Vec<u8> = b"old".to_vec();
        WriteSink::write(&mut sink, b"new!").unwrap();
        assert_eq!(sink, b"new!");
    }
}
