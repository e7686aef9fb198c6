//! GPUI rendering and input routing for the rclick context menu.

pub mod icon;
pub mod key_bindings;
pub mod right_click;
pub mod theme;

pub use icon::{Icon, IconName, IconSize};
pub use key_bindings::register_key_bindings;
pub use right_click::{estimate_menu_size, RightClick, RightClickEvent};
pub use theme::{RclickTheme, ThemeColors};
