//! Menu behavior configuration.
//!
//! Defaults reproduce the standard right-click behavior; every field can be
//! overridden from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RclickError;

/// Which environment signals close an open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissConfig {
    /// Primary click anywhere outside the menu.
    pub on_click: bool,
    /// A contextual-activation gesture anywhere outside the menu.
    pub on_context_menu: bool,
    /// Any scroll.
    pub on_scroll: bool,
    /// Viewport resize.
    pub on_resize: bool,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self { on_click: true, on_context_menu: true, on_scroll: true, on_resize: true }
    }
}

/// Configuration for a `ContextMenu`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Prefix for generated element ids.
    pub id_prefix: String,
    /// Whether arrow navigation wraps around at either end.
    pub wrap: bool,
    /// Whether choosing an item closes the menu.
    pub close_on_select: bool,
    /// Space kept free between the menu and the viewport edges, in pixels.
    pub viewport_margin: f32,
    pub dismiss: DismissConfig,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            id_prefix: "rclick".to_string(),
            wrap: true,
            close_on_select: true,
            viewport_margin: 0.0,
            dismiss: DismissConfig::default(),
        }
    }
}

impl MenuConfig {
    /// Parse and validate configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RclickError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RclickError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| RclickError::io(path, e))?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded menu config");
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), RclickError> {
        if self.id_prefix.trim().is_empty() {
            return Err(RclickError::config("id_prefix must not be empty"));
        }
        if !self.viewport_margin.is_finite() || self.viewport_margin < 0.0 {
            return Err(RclickError::config(format!(
                "viewport_margin must be a non-negative number, got {}",
                self.viewport_margin
            )));
        }
        Ok(())
    }

    /// Builder: set the id prefix.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Builder: set whether navigation wraps.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Builder: set whether selection closes the menu.
    pub fn with_close_on_select(mut self, close: bool) -> Self {
        self.close_on_select = close;
        self
    }

    /// Builder: set the viewport margin.
    pub fn with_viewport_margin(mut self, margin: f32) -> Self {
        self.viewport_margin = margin;
        self
    }

    /// Builder: set dismissal triggers.
    pub fn with_dismiss(mut self, dismiss: DismissConfig) -> Self {
        self.dismiss = dismiss;
        self
    }
}

#[cfg(feature = "gpui")]
impl gpui::Global for MenuConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MenuConfig::default();
        assert_eq!(config.id_prefix, "rclick");
        assert!(config.wrap);
        assert!(config.close_on_select);
        assert_eq!(config.viewport_margin, 0.0);
        assert_eq!(config.dismiss, DismissConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            MenuConfig::from_json(r#"{"wrap": false, "dismiss": {"on_scroll": false}}"#).unwrap();
        assert!(!config.wrap);
        assert!(!config.dismiss.on_scroll);
        assert!(config.dismiss.on_click);
        assert_eq!(config.id_prefix, "rclick");
    }

    #[test]
    fn test_validation_errors() {
        let err = MenuConfig::from_json(r#"{"viewport_margin": -4}"#).unwrap_err();
        assert!(matches!(err, RclickError::Config { .. }));

        let err = MenuConfig::from_json(r#"{"id_prefix": "  "}"#).unwrap_err();
        assert!(matches!(err, RclickError::Config { .. }));

        let err = MenuConfig::from_json(r#"{"wrap": "yes"}"#).unwrap_err();
        assert!(matches!(err, RclickError::Json { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id_prefix": "ctx", "viewport_margin": 8}}"#).unwrap();

        let config = MenuConfig::load(file.path()).unwrap();
        assert_eq!(config.id_prefix, "ctx");
        assert_eq!(config.viewport_margin, 8.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MenuConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, RclickError::Io { .. }));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = MenuConfig::default().with_wrap(false).with_viewport_margin(2.5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(MenuConfig::from_json(&json).unwrap(), config);
    }
}
