//! Background text materialization.
//!
//! Reading a large resource and decoding it can take a while, so it runs on
//! a worker thread. The owning session polls or waits for the result.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::app::domain::charset::{CharsetGuess, SingleByteCharset};
use crate::app::domain::resource::ByteSource;
use crate::app::infrastructure::error::{AppError, Result};

/// Decoded text plus the charset it was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedText {
    pub charset: CharsetGuess,
    pub text: String,
}

/// Detect the charset of `data` and decode it.
pub fn decode_text(data: &[u8], fallback: SingleByteCharset) -> Result<LoadedText> {
    let charset = CharsetGuess::detect(data, fallback);
    let text = charset.decode(data)?;
    Ok(LoadedText { charset, text })
}

/// Read the bytes (unless `bytes` already holds them) and decode.
pub fn load_text(
    source: &dyn ByteSource,
    bytes: Option<Vec<u8>>,
    fallback: SingleByteCharset,
) -> Result<LoadedText> {
    let data = match bytes {
        Some(data) => data,
        None => source.read_all()?,
    };
    let loaded = decode_text(&data, fallback)?;
    info!(
        "Loaded {} bytes as {} text",
        data.len(),
        loaded.charset
    );
    Ok(loaded)
}

/// A load running on a worker thread.
pub struct PendingTextLoad {
    rx: Receiver<Result<LoadedText>>,
    worker: Option<JoinHandle<()>>,
}

impl PendingTextLoad {
    /// Start loading on a new thread.
    ///
    /// `bytes` short-circuits the read, e.g. when the raw view already holds
    /// newer content than the resource.
    pub fn spawn(
        source: Arc<dyn ByteSource>,
        bytes: Option<Vec<u8>>,
        fallback: SingleByteCharset,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("text-loader".to_string())
            .spawn(move || {
                let result = load_text(source.as_ref(), bytes, fallback);
                // Receiver gone means the session was dropped; nothing to do
                let _ = tx.send(result);
            })?;
        debug!("Text loader started");
        Ok(Self {
            rx,
            worker: Some(worker),
        })
    }

    /// Non-blocking check. `None` while the worker is still running.
    pub fn try_finish(&mut self) -> Option<Result<LoadedText>> {
        match self.rx.try_recv() {
            Ok(result) => Some(self.join(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.join(Err(AppError::LoaderLost))),
        }
    }

    /// Block until the worker reports.
    pub fn wait(mut self) -> Result<LoadedText> {
        let result = self.rx.recv().unwrap_or(Err(AppError::LoaderLost));
        self.join(result)
    }

    fn join(&mut self, result: Result<LoadedText>) -> Result<LoadedText> {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                return Err(AppError::LoaderLost);
            }
        }
        result
    }
}
