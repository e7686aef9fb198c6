//! Theme definitions for rclick menus.

use gpui::{rgb, rgba, Global, Hsla, WindowAppearance};

/// Colors the menu is drawn with.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Window background color.
    pub background: Hsla,
    /// Menu background.
    pub elevated_surface: Hsla,
    /// Primary text color.
    pub text: Hsla,
    /// Disabled items and shortcut hints.
    pub text_muted: Hsla,
    /// Menu border and separators.
    pub border: Hsla,
    /// Background of the active item.
    pub item_active: Hsla,
    /// Background of a hovered, inactive item.
    pub item_hover: Hsla,
}

impl ThemeColors {
    /// Dark palette (Catppuccin Mocha).
    pub fn dark() -> Self {
        Self {
            background: rgb(0x1e1e2e).into(),
            elevated_surface: rgb(0x313244).into(),
            text: rgb(0xcdd6f4).into(),
            text_muted: rgb(0xa6adc8).into(),
            border: rgb(0x45475a).into(),
            item_active: rgba(0x89b4fa4d).into(),
            item_hover: rgb(0x585b70).into(),
        }
    }

    /// Light palette (Catppuccin Latte).
    pub fn light() -> Self {
        Self {
            background: rgb(0xeff1f5).into(),
            elevated_surface: rgb(0xe6e9ef).into(),
            text: rgb(0x4c4f69).into(),
            text_muted: rgb(0x6c6f85).into(),
            border: rgb(0xdce0e8).into(),
            item_active: rgba(0x1e66f540).into(),
            item_hover: rgb(0xccd0da).into(),
        }
    }
}

/// Global theme read by the menu view and icons.
#[derive(Debug, Clone)]
pub struct RclickTheme {
    pub name: String,
    pub appearance: WindowAppearance,
    pub colors: ThemeColors,
}

impl RclickTheme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            appearance: WindowAppearance::Dark,
            colors: ThemeColors::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            appearance: WindowAppearance::Light,
            colors: ThemeColors::light(),
        }
    }

    /// Pick the theme matching the system appearance.
    pub fn for_appearance(appearance: WindowAppearance) -> Self {
        match appearance {
            WindowAppearance::Light | WindowAppearance::VibrantLight => Self::light(),
            WindowAppearance::Dark | WindowAppearance::VibrantDark => Self::dark(),
        }
    }
}

impl Default for RclickTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Global for RclickTheme {}
