//! Core types and state logic for the rclick context menu.
//!
//! This crate holds everything that decides how a right-click menu behaves,
//! independent of any rendering toolkit:
//!
//! - **item**: Menu item model (actions, dividers, icons, item ids)
//! - **activation**: Visibility, cursor tracking and dismissal listeners
//! - **geometry**: Viewport clamping and the open/measure lifecycle
//! - **navigation**: Active item state machine
//! - **menu**: The `ContextMenu` tying the pieces together
//! - **viewport**: Live viewport size source
//! - **observable**: Change-notifying values and event emitters
//! - **host**: Abstract event targets and regions supplied by the host
//! - **config**: Menu behavior configuration
//! - **logging**: Structured logging setup

pub mod accessibility;
pub mod activation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod item;
pub mod keys;
pub mod logging;
pub mod menu;
pub mod navigation;
pub mod observable;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use accessibility::{AccessibilityNode, Role};
pub use activation::{ActivationController, ActivationState};
pub use config::{DismissConfig, MenuConfig};
pub use error::RclickError;
pub use geometry::{resolve_position, resolve_position_with_margin, MeasurePhase, MenuGeometry, Point, Size};
pub use host::{
    dispatch, EventKind, EventRegistry, EventTarget, HostEvent, ListenerId, ListenerOptions,
    MenuRoot, NodeId, Region,
};
pub use item::{items_from_value, parse_menu, IconFactory, ItemIds, MenuAction, MenuIcon, MenuItem, ResolvedIcon};
pub use keys::{Key, KeyOutcome};
pub use menu::ContextMenu;
pub use navigation::Navigation;
pub use observable::{Emitter, Observable, Subscription};
pub use viewport::ViewportSource;
