use super::representation::Representation;

/// Notifications a session publishes to its host.
///
/// The host maps these onto widgets: tab enablement, the save button, and
/// blocking the window while text is loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A representation became the active tab.
    Activated(Representation),
    /// A representation was materialized and can now be selected.
    RepresentationEnabled(Representation),
    /// A representation is permanently unavailable (size limit).
    RepresentationBlocked(Representation),
    SaveEnabled(bool),
    /// The text loader started (`true`) or finished (`false`).
    Blocked(bool),
    TextLoadFailed(String),
}
