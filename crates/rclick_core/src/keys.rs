//! Platform-neutral key vocabulary for menu navigation.

/// Keys the menu reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Tab,
    /// Any key the menu does not handle.
    Other,
}

impl Key {
    /// Enter and Space both confirm the active item.
    pub fn is_confirm(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Result of offering a key to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The menu consumed the key; the host should suppress default handling.
    Handled,
    /// The menu did not care about the key.
    Ignored,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}
