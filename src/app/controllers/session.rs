//! Edit session for one resource shown as text and as raw bytes.
//!
//! Exactly one of the two editing views is authoritative at a time. The raw
//! view is built on first use, the text view is loaded on a worker thread,
//! and switching views copies content across first when the two have
//! diverged.

use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};

use crate::app::domain::charset::{CharsetGuess, SingleByteCharset};
use crate::app::domain::messages::SessionEvent;
use crate::app::domain::representation::Representation;
use crate::app::domain::resource::{ResourceHandle, WriteSink};
use crate::app::domain::settings::{EditorSettings, SizeLimits};
use crate::app::domain::surface::{ByteSurface, TextSurface};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::prompt::{CloseChoice, Prompt};
use crate::app::infrastructure::status::{LogStatus, StatusLevel, StatusReporter};
use crate::app::services::text_loader::{LoadedText, PendingTextLoad};
use crate::app::services::text_ops::{cursor_status, offset_status};

/// What `close` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Nothing was modified.
    Clean,
    Saved,
    Discarded,
    /// Modified, but there was nowhere to save to.
    DiscardedUnsaveable,
}

struct TextPane<T> {
    surface: T,
    /// Pinned at load time for every later encode/decode.
    charset: CharsetGuess,
}

pub struct SyncedContentSession<T: TextSurface, B: ByteSurface> {
    handle: ResourceHandle,
    limits: SizeLimits,
    fallback_charset: SingleByteCharset,
    strict_commit: bool,

    active: Representation,
    text: Option<TextPane<T>>,
    raw: Option<B>,
    raw_blocked: bool,

    /// False once either view was edited after the last synchronization.
    synced: bool,
    text_modified: bool,
    raw_modified: bool,
    /// Editing view that received the most recent edit.
    last_edited: Option<Representation>,
    /// Editing view that was active most recently.
    last_editor: Option<Representation>,

    /// Open while a text load runs; every state change is refused meanwhile.
    pending_load: Option<PendingTextLoad>,
    raw_edited_while_loading: bool,

    prompt: Box<dyn Prompt>,
    status: Box<dyn StatusReporter>,
    events: Option<Sender<SessionEvent>>,
}

impl<T: TextSurface, B: ByteSurface> SyncedContentSession<T, B> {
    pub fn new(handle: ResourceHandle, settings: &EditorSettings, prompt: Box<dyn Prompt>) -> Self {
        debug!("Opening session for {:?}", handle);
        Self {
            handle,
            limits: settings.size_limits,
            fallback_charset: settings.fallback_charset,
            strict_commit: settings.strict_commit,
            active: Representation::View,
            text: None,
            raw: None,
            raw_blocked: false,
            synced: true,
            text_modified: false,
            raw_modified: false,
            last_edited: None,
            last_editor: None,
            pending_load: None,
            raw_edited_while_loading: false,
            prompt,
            status: Box::new(LogStatus::default()),
            events: None,
        }
    }

    pub fn with_status(mut self, status: Box<dyn StatusReporter>) -> Self {
        self.status = status;
        self
    }

    pub fn with_events(mut self, events: Sender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    // --- State queries ---

    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn active(&self) -> Representation {
        self.active
    }

    pub fn is_text_enabled(&self) -> bool {
        self.text.is_some()
    }

    pub fn is_raw_enabled(&self) -> bool {
        self.raw.is_some()
    }

    pub fn is_raw_blocked(&self) -> bool {
        self.raw_blocked || self.handle.size() >= self.limits.block_raw
    }

    /// Only meaningful once both views exist; otherwise trivially true.
    pub fn is_in_sync(&self) -> bool {
        if self.text.is_some() && self.raw.is_some() {
            self.synced
        } else {
            true
        }
    }

    pub fn is_text_modified(&self) -> bool {
        self.text.is_some() && self.text_modified
    }

    pub fn is_raw_modified(&self) -> bool {
        self.raw
            .as_ref()
            .is_some_and(|raw| self.raw_modified || raw.is_modified())
    }

    pub fn is_modified(&self) -> bool {
        self.is_text_modified() || self.is_raw_modified()
    }

    /// True while a text load holds the blocking window open.
    pub fn is_busy(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn text_charset(&self) -> Option<CharsetGuess> {
        self.text.as_ref().map(|pane| pane.charset)
    }

    pub fn text_surface(&self) -> Option<&T> {
        self.text.as_ref().map(|pane| &pane.surface)
    }

    /// Edits made through this reference must be reported with
    /// `on_text_modified`.
    pub fn text_surface_mut(&mut self) -> Option<&mut T> {
        self.text.as_mut().map(|pane| &mut pane.surface)
    }

    pub fn raw_surface(&self) -> Option<&B> {
        self.raw.as_ref()
    }

    /// Edits made through this reference must be reported with
    /// `on_raw_modified`.
    pub fn raw_surface_mut(&mut self) -> Option<&mut B> {
        self.raw.as_mut()
    }

    // --- Representation switching ---

    /// Make `target` the active view.
    ///
    /// Materializes it on first use and synchronizes it from the other view
    /// when they have diverged. The switch is only observed after the
    /// target's content is current. Selecting an unloaded text view loads it
    /// synchronously; use `open_text_editor` to load in the background.
    pub fn select_representation(&mut self, target: Representation) -> Result<()> {
        self.ensure_idle()?;
        if target == self.active {
            return Ok(());
        }

        match target {
            Representation::View => {}
            Representation::Text => {
                if self.text.is_none() {
                    self.begin_text_load()?;
                    // Activates the text view on success
                    return self.wait_text_load();
                }
                self.reconcile_into(Representation::Text)?;
            }
            Representation::Raw => {
                if self.raw.is_none() {
                    self.materialize_raw()?;
                } else {
                    self.reconcile_into(Representation::Raw)?;
                }
            }
        }

        self.activate(target);
        Ok(())
    }

    /// "Edit as text": select the text view, loading it in the background
    /// first if needed. Finish with `poll_text_load` or `wait_text_load`.
    pub fn open_text_editor(&mut self) -> Result<()> {
        self.ensure_idle()?;
        if self.text.is_some() {
            return self.select_representation(Representation::Text);
        }
        self.begin_text_load()
    }

    /// Finish a background load if the worker is done. `None` while it is
    /// still running or when no load was started.
    pub fn poll_text_load(&mut self) -> Option<Result<()>> {
        let result = self.pending_load.as_mut()?.try_finish()?;
        self.pending_load = None;
        Some(self.complete_text_load(result))
    }

    /// Block until a background load finishes.
    pub fn wait_text_load(&mut self) -> Result<()> {
        match self.pending_load.take() {
            Some(pending) => {
                let result = pending.wait();
                self.complete_text_load(result)
            }
            None => Ok(()),
        }
    }

    fn begin_text_load(&mut self) -> Result<()> {
        let size = self.handle.size();
        if size >= self.limits.block_text {
            self.status.report(
                StatusLevel::Error,
                &format!("File is too big for the text editor ({} bytes).", size),
            );
            return Err(AppError::Capacity {
                representation: Representation::Text,
                size,
                limit: self.limits.block_text,
            });
        }
        if size >= self.limits.warn_text && !self.prompt.confirm_large_text(size) {
            return Err(AppError::TextLoadDeclined { size });
        }

        // Raw holds the newest bytes once it exists
        let bytes = self.raw.as_ref().map(|raw| raw.bytes());
        let pending = PendingTextLoad::spawn(self.handle.source(), bytes, self.fallback_charset)?;
        self.pending_load = Some(pending);
        self.raw_edited_while_loading = false;
        self.emit(SessionEvent::Blocked(true));
        Ok(())
    }

    /// Caller must already have taken `pending_load`, which closes the
    /// blocking window whatever the result.
    fn complete_text_load(&mut self, result: Result<LoadedText>) -> Result<()> {
        self.emit(SessionEvent::Blocked(false));
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Text load of {} failed: {}", self.handle.name(), e);
                self.status.report(StatusLevel::Error, "Error reading file data.");
                self.emit(SessionEvent::TextLoadFailed(e.to_string()));
                return Err(e);
            }
        };

        let mut surface = T::with_text(loaded.text);
        surface.set_caret(0);
        // Loading must not be undoable
        surface.discard_undo_history();
        self.text = Some(TextPane {
            surface,
            charset: loaded.charset,
        });
        self.text_modified = false;
        self.synced = !self.raw_edited_while_loading;
        self.emit(SessionEvent::RepresentationEnabled(Representation::Text));
        self.emit_save_enabled();
        self.activate(Representation::Text);
        Ok(())
    }

    fn materialize_raw(&mut self) -> Result<()> {
        let size = self.handle.size();
        if self.is_raw_blocked() {
            self.raw_blocked = true;
            self.emit(SessionEvent::RepresentationBlocked(Representation::Raw));
            return Err(AppError::Capacity {
                representation: Representation::Raw,
                size,
                limit: self.limits.block_raw,
            });
        }

        // Build the final content before touching any state
        let bytes = match &self.text {
            Some(pane) if !self.synced => pane.charset.encode(&pane.surface.text())?,
            _ => self.handle.read_all()?,
        };
        let mut raw = B::with_bytes(bytes);
        raw.clear_modified();
        self.raw = Some(raw);
        self.raw_modified = false;
        self.synced = true;
        debug!("Raw view materialized for {}", self.handle.name());
        self.emit(SessionEvent::RepresentationEnabled(Representation::Raw));
        Ok(())
    }

    /// Copy into `target` only when its counterpart holds the newest edits.
    /// When `target` itself was edited last it stays as it is, and the views
    /// remain out of sync until the counterpart is selected.
    fn reconcile_into(&mut self, target: Representation) -> Result<()> {
        if self.is_in_sync() {
            return Ok(());
        }
        let Some(source) = target.counterpart() else {
            return Ok(());
        };
        if self.last_edited != Some(source) {
            debug!("{} view holds the newest edits; nothing to copy", target);
            return Ok(());
        }
        match target {
            Representation::Text => self.sync_into_text(),
            Representation::Raw => self.sync_into_raw(),
            Representation::View => Ok(()),
        }
    }

    fn sync_into_text(&mut self) -> Result<()> {
        if let (Some(pane), Some(raw)) = (self.text.as_mut(), self.raw.as_ref()) {
            let decoded = pane.charset.decode(&raw.bytes())?;
            let caret = pane.surface.caret();
            let len = decoded.chars().count();
            pane.surface.set_text(&decoded);
            pane.surface.set_caret(caret.min(len));
            // The replacement itself must not be undoable
            pane.surface.discard_undo_history();
        }
        self.synced = true;
        debug!("Text view synchronized from raw");
        Ok(())
    }

    fn sync_into_raw(&mut self) -> Result<()> {
        if let (Some(pane), Some(raw)) = (self.text.as_ref(), self.raw.as_mut()) {
            let bytes = pane.charset.encode(&pane.surface.text())?;
            raw.set_bytes(bytes, pane.charset);
        }
        self.synced = true;
        debug!("Raw view synchronized from text");
        Ok(())
    }

    fn activate(&mut self, target: Representation) {
        self.active = target;
        if target.is_editable() {
            self.last_editor = Some(target);
        }
        self.emit(SessionEvent::Activated(target));
        self.refresh_status();
    }

    // --- Edit notifications ---

    /// The text surface reported a content change.
    pub fn on_text_modified(&mut self) {
        if self.text.is_none() {
            return;
        }
        self.text_modified = true;
        self.synced = false;
        self.last_edited = Some(Representation::Text);
        self.emit_save_enabled();
    }

    /// The byte surface reported a content change.
    pub fn on_raw_modified(&mut self) {
        if self.raw.is_none() {
            return;
        }
        self.raw_modified = true;
        self.synced = false;
        self.last_edited = Some(Representation::Raw);
        if self.pending_load.is_some() {
            self.raw_edited_while_loading = true;
        }
        self.emit_save_enabled();
    }

    /// The caret or hex offset moved.
    pub fn on_caret_moved(&mut self) {
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let text = match (self.active, &self.text, &self.raw) {
            (Representation::Text, Some(pane), _) => {
                cursor_status(&pane.surface.text(), pane.surface.caret())
            }
            (Representation::Raw, _, Some(raw)) => offset_status(raw.offset()),
            _ => String::new(),
        };
        self.status.set_cursor_text(&text);
    }

    // --- Commit ---

    /// The view whose content a commit writes: the active one, or while
    /// View is showing, the editing view that was active last.
    pub fn commit_basis(&self) -> Option<Representation> {
        match self.active {
            Representation::View => self.last_editor,
            editing => Some(editing),
        }
    }

    /// Serialize the commit basis. Text is encoded with its pinned charset,
    /// raw bytes are taken as they are. With nothing ever materialized the
    /// original bytes are returned.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let basis = self.commit_basis();
        if !self.is_in_sync() {
            if let Some(edited) = self.last_edited.filter(|e| Some(*e) != basis) {
                if self.strict_commit {
                    return Err(AppError::UnreconciledEdits(edited));
                }
                warn!(
                    "Committing {:?} while {} holds unsynchronized edits; those edits are not written",
                    basis, edited
                );
            }
        }

        match (basis, &self.text, &self.raw) {
            (Some(Representation::Text), Some(pane), _) => {
                pane.charset.encode(&pane.surface.text())
            }
            (Some(Representation::Raw), _, Some(raw)) => Ok(raw.bytes()),
            _ => self.handle.read_all(),
        }
    }

    /// Write the commit basis to `sink`. Modified flags are left alone.
    pub fn write(&mut self, sink: &mut dyn WriteSink) -> Result<()> {
        self.ensure_idle()?;
        let bytes = self.serialize()?;
        sink.write(&bytes)?;
        info!(
            "Wrote {} bytes of {} to {}",
            bytes.len(),
            self.handle.name(),
            sink.location()
        );
        Ok(())
    }

    /// Write, then mark both views unmodified.
    pub fn save(&mut self, sink: &mut dyn WriteSink) -> Result<()> {
        self.write(sink)?;
        self.text_modified = false;
        self.raw_modified = false;
        if let Some(raw) = self.raw.as_mut() {
            raw.clear_modified();
        }
        self.emit_save_enabled();
        Ok(())
    }

    /// Reconcile pending edits before the session goes away.
    ///
    /// With modifications, the prompt decides: Save writes to `sink` first,
    /// Discard drops the edits, Cancel fails with `UserCancelledClose` and
    /// leaves the session untouched. `sink = None` means the resource has
    /// no writable destination; edits are then dropped with a warning.
    pub fn close(&mut self, sink: Option<&mut dyn WriteSink>) -> Result<CloseOutcome> {
        self.ensure_idle()?;
        if !self.is_modified() {
            return Ok(CloseOutcome::Clean);
        }

        let Some(sink) = sink else {
            let message = format!(
                "No output location for {}; changes discarded",
                self.handle.name()
            );
            warn!("{}", message);
            self.status.report(StatusLevel::Warning, &message);
            return Ok(CloseOutcome::DiscardedUnsaveable);
        };

        match self.prompt.choose_close_action(&sink.location()) {
            CloseChoice::Save => {
                self.save(sink)?;
                Ok(CloseOutcome::Saved)
            }
            CloseChoice::Discard => {
                info!("Discarding changes to {}", self.handle.name());
                Ok(CloseOutcome::Discarded)
            }
            CloseChoice::Cancel => Err(AppError::UserCancelledClose),
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.pending_load.is_some() {
            Err(AppError::Busy)
        } else {
            Ok(())
        }
    }

    fn emit_save_enabled(&self) {
        self.emit(SessionEvent::SaveEnabled(self.is_modified()));
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            // A host that stopped listening is not an error
            let _ = events.send(event);
        }
    }
}
