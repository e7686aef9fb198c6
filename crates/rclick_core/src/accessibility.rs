//! Accessibility tree snapshot for an open menu.

use serde::Serialize;

use crate::item::{ItemIds, MenuItem};

/// Accessibility role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Menu,
    MenuItem,
    Separator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::MenuItem => "menuitem",
            Self::Separator => "separator",
        }
    }
}

/// A node in the accessibility tree the host exposes to assistive technology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityNode {
    pub id: String,
    pub role: Role,
    pub label: Option<String>,
    pub disabled: bool,
    /// Only the menu root takes focus; items are reached through
    /// `active_descendant`.
    pub focusable: bool,
    pub active_descendant: Option<String>,
    /// Keyboard shortcut hint for menu items.
    pub shortcut: Option<String>,
    pub children: Vec<AccessibilityNode>,
}

impl AccessibilityNode {
    /// Build the tree for `items` with `active` highlighted.
    pub fn menu<N>(ids: &ItemIds, items: &[MenuItem<N>], active: Option<usize>) -> Self {
        let children = items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                MenuItem::Action(action) => Self {
                    id: ids.item_id(index),
                    role: Role::MenuItem,
                    label: Some(action.label.clone()),
                    disabled: action.disabled,
                    focusable: false,
                    active_descendant: None,
                    shortcut: action.shortcut.clone(),
                    children: Vec::new(),
                },
                MenuItem::Divider => Self {
                    id: ids.item_id(index),
                    role: Role::Separator,
                    label: None,
                    disabled: false,
                    focusable: false,
                    active_descendant: None,
                    shortcut: None,
                    children: Vec::new(),
                },
            })
            .collect();

        Self {
            id: ids.menu_id(),
            role: Role::Menu,
            label: None,
            disabled: false,
            focusable: true,
            active_descendant: active.map(|index| ids.item_id(index)),
            shortcut: None,
            children,
        }
    }
}
