use std::fmt;

/// The three tabs a resource can be shown in.
///
/// `View` is a placeholder that is always available. `Text` and `Raw` are
/// backed by editing surfaces that are only built on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    #[default]
    View,
    Text,
    Raw,
}

impl Representation {
    pub const ALL: [Representation; 3] = [
        Representation::View,
        Representation::Text,
        Representation::Raw,
    ];

    /// True for the representations that own an editable buffer.
    pub fn is_editable(self) -> bool {
        !matches!(self, Representation::View)
    }

    /// The other editing representation (`Text` <-> `Raw`).
    pub fn counterpart(self) -> Option<Representation> {
        match self {
            Representation::Text => Some(Representation::Raw),
            Representation::Raw => Some(Representation::Text),
            Representation::View => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::View => "View",
            Representation::Text => "Text",
            Representation::Raw => "Raw",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart() {
        assert_eq!(Representation::Text.counterpart(), Some(Representation::Raw));
        assert_eq!(Representation::Raw.counterpart(), Some(Representation::Text));
        assert_eq!(Representation::View.counterpart(), None);
    }

    #[test]
    fn test_only_view_is_read_only() {
        let editable: Vec<_> = Representation::ALL
            .iter()
            .filter(|r| r.is_editable())
            .collect();
        assert_eq!(editable, vec![&Representation::Text, &Representation::Raw]);
        assert_eq!(Representation::default(), Representation::View);
    }
}
