//! Keyboard actions for context menus and their default bindings.

use gpui::{App, KeyBinding};

/// Key context set on an open menu.
pub const CONTEXT_MENU_KEY_CONTEXT: &str = "ContextMenu";

// ============================================================================
// Context Menu Actions
// ============================================================================

pub mod context_menu {
    use gpui::actions;
    actions!(
        context_menu,
        [SelectNextItem, SelectPreviousItem, SelectFirstItem, SelectLastItem, ConfirmItem, DismissMenu,]
    );
}

// ============================================================================
// Key Binding Registration
// ============================================================================

/// Register the context menu key bindings.
///
/// This should be called once during application initialization.
pub fn register_key_bindings(cx: &mut App) {
    let context = Some(CONTEXT_MENU_KEY_CONTEXT);
    cx.bind_keys([
        KeyBinding::new("down", context_menu::SelectNextItem, context),
        KeyBinding::new("up", context_menu::SelectPreviousItem, context),
        KeyBinding::new("home", context_menu::SelectFirstItem, context),
        KeyBinding::new("end", context_menu::SelectLastItem, context),
        KeyBinding::new("enter", context_menu::ConfirmItem, context),
        KeyBinding::new("space", context_menu::ConfirmItem, context),
        KeyBinding::new("escape", context_menu::DismissMenu, context),
        KeyBinding::new("tab", context_menu::DismissMenu, context),
    ]);
}
