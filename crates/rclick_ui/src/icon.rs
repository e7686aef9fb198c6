//! Icon system for rclick menus.
//!
//! Provides the IconName enum with the icons menu items commonly carry and an
//! Icon component for rendering them at various sizes.

use gpui::{div, prelude::*, px, App, Hsla, IntoElement, Pixels, RenderOnce, SharedString, Window};
use serde::{Deserialize, Serialize};

use crate::RclickTheme;

macro_rules! icon_names {
    ($($variant:ident => $name:literal, $glyph:literal;)*) => {
        /// All available icons.
        ///
        /// Menu descriptions refer to these by their snake_case name, e.g.
        /// `{"label": "Copy", "icon": "copy"}`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum IconName {
            $($variant,)*
        }

        impl IconName {
            /// Every icon, in declaration order.
            pub const ALL: &'static [IconName] = &[$(IconName::$variant,)*];

            /// Class name used in menu descriptions.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Glyph drawn for the icon; no image assets are needed.
            pub fn as_char(&self) -> &'static str {
                match self {
                    $(Self::$variant => $glyph,)*
                }
            }
        }
    };
}

icon_names! {
    Cut => "cut", "\u{2702}";
    Copy => "copy", "\u{29c9}";
    Paste => "paste", "\u{1f4cb}";
    Edit => "edit", "\u{270e}";
    Trash => "trash", "\u{1f5d1}";
    Undo => "undo", "\u{21b6}";
    Redo => "redo", "\u{21b7}";
    Plus => "plus", "+";
    Close => "close", "\u{00d7}";
    File => "file", "\u{1f4c4}";
    Folder => "folder", "\u{1f4c1}";
    Save => "save", "\u{1f4be}";
    Export => "export", "\u{2197}";
    Import => "import", "\u{2199}";
    ChevronRight => "chevron_right", "\u{203a}";
    Search => "search", "\u{2315}";
    Refresh => "refresh", "\u{21bb}";
    Link => "link", "\u{1f517}";
    Check => "check", "\u{2713}";
    Info => "info", "\u{2139}";
    Warning => "warning", "\u{26a0}";
    Settings => "settings", "\u{2699}";
    Pin => "pin", "\u{1f4cc}";
    Bookmark => "bookmark", "\u{2605}";
}

impl IconName {
    /// Look up an icon by its class name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|icon| icon.name() == name)
    }
}

/// Size variants for icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    /// Extra small: 12px
    XSmall,
    /// Small: 14px
    Small,
    /// Medium: 16px (default)
    #[default]
    Medium,
}

impl IconSize {
    /// Get the size in pixels.
    pub fn pixels(&self) -> Pixels {
        match self {
            Self::XSmall => px(12.0),
            Self::Small => px(14.0),
            Self::Medium => px(16.0),
        }
    }
}

/// Icon component for rendering icons.
#[derive(IntoElement)]
pub struct Icon {
    name: IconName,
    size: IconSize,
    color: Option<Hsla>,
}

impl Icon {
    /// Create a new icon with the given name.
    pub fn new(name: IconName) -> Self {
        Self { name, size: IconSize::default(), color: None }
    }

    /// Set the icon size.
    pub fn size(mut self, size: IconSize) -> Self {
        self.size = size;
        self
    }

    /// Set a custom color for the icon.
    pub fn color(mut self, color: Hsla) -> Self {
        self.color = Some(color);
        self
    }
}

impl RenderOnce for Icon {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.global::<RclickTheme>();
        let size = self.size.pixels();
        let color = self.color.unwrap_or(theme.colors.text);

        div()
            .size(size)
            .flex()
            .items_center()
            .justify_center()
            .text_color(color)
            .text_size(size)
            .line_height(size)
            .child(SharedString::from(self.name.as_char()))
    }
}
