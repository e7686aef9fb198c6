//! Menu item model.
//!
//! A menu is an ordered list of [`MenuItem`]s: selectable [`MenuAction`]s and
//! purely visual dividers. Order is display order and navigation order.
//!
//! Items are generic over `N`, the host's visual node type, so icons can be
//! handed over as pre-built nodes or as factories producing them.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::RclickError;

/// Field that marks an entry as a divider when set to [`DIVIDER_TYPE`].
pub const TYPE_FIELD: &str = "type";
/// Discriminant value for dividers.
pub const DIVIDER_TYPE: &str = "divider";

// ============================================================================
// Icons
// ============================================================================

/// Factory producing an icon node on demand.
pub type IconFactory<N> = Rc<dyn Fn() -> N>;

/// An icon as supplied by the menu description.
pub enum MenuIcon<N> {
    /// Name of a style class (e.g. an icon font glyph class).
    Class(String),
    /// A node the host has already built.
    Node(N),
    /// A component to instantiate when the item is rendered.
    Component(IconFactory<N>),
}

/// An icon normalized for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIcon<N> {
    /// Render an element carrying this class.
    Class(String),
    /// Render this node as-is.
    Node(N),
}

impl<N: Clone> MenuIcon<N> {
    /// Normalize into something the renderer can place directly.
    pub fn resolve(&self) -> ResolvedIcon<N> {
        match self {
            Self::Class(class) => ResolvedIcon::Class(class.clone()),
            Self::Node(node) => ResolvedIcon::Node(node.clone()),
            Self::Component(factory) => ResolvedIcon::Node(factory()),
        }
    }
}

impl<N> MenuIcon<N> {
    /// Wrap a factory closure.
    pub fn component(factory: impl Fn() -> N + 'static) -> Self {
        Self::Component(Rc::new(factory))
    }
}

impl<N: Clone> Clone for MenuIcon<N> {
    fn clone(&self) -> Self {
        match self {
            Self::Class(class) => Self::Class(class.clone()),
            Self::Node(node) => Self::Node(node.clone()),
            Self::Component(factory) => Self::Component(factory.clone()),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for MenuIcon<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Component(_) => f.write_str("Component(..)"),
        }
    }
}

impl<N> From<&str> for MenuIcon<N> {
    fn from(class: &str) -> Self {
        Self::Class(class.to_string())
    }
}

impl<N> From<String> for MenuIcon<N> {
    fn from(class: String) -> Self {
        Self::Class(class)
    }
}

// ============================================================================
// MenuAction
// ============================================================================

/// A selectable menu entry.
#[derive(Debug, Clone)]
pub struct MenuAction<N = ()> {
    /// Text shown for the entry. Doubles as identity key when `id` is unset.
    pub label: String,
    /// Explicit identity key.
    pub id: Option<String>,
    /// Disabled entries render but can never become active or be chosen.
    pub disabled: bool,
    pub icon: Option<MenuIcon<N>>,
    /// Shortcut hint displayed next to the label.
    pub shortcut: Option<String>,
    /// Any other fields from the menu description, handed back untouched with
    /// the selection.
    pub extra: Map<String, Value>,
}

impl<N> MenuAction<N> {
    /// Create an enabled action with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: None,
            disabled: false,
            icon: None,
            shortcut: None,
            extra: Map::new(),
        }
    }

    /// Builder: set an explicit id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set disabled state.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Builder: add an icon.
    pub fn icon(mut self, icon: impl Into<MenuIcon<N>>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builder: add a shortcut hint.
    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Builder: attach an opaque extra field.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Identity key: the explicit id, falling back to the label.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.label)
    }

    /// Serialize back into the declarative JSON form.
    ///
    /// Only class icons survive; node and component icons have no JSON form.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("label".into(), Value::String(self.label.clone()));
        if let Some(id) = &self.id {
            map.insert("id".into(), Value::String(id.clone()));
        }
        if self.disabled {
            map.insert("disabled".into(), Value::Bool(true));
        }
        if let Some(MenuIcon::Class(class)) = &self.icon {
            map.insert("icon".into(), Value::String(class.clone()));
        }
        if let Some(shortcut) = &self.shortcut {
            map.insert("shortcut".into(), Value::String(shortcut.clone()));
        }
        Value::Object(map)
    }

    fn from_map(index: usize, mut map: Map<String, Value>) -> Result<Self, RclickError> {
        let label = match map.remove("label") {
            Some(Value::String(label)) => label,
            Some(_) => return Err(RclickError::invalid_item(index, "\"label\" must be a string")),
            None => return Err(RclickError::invalid_item(index, "missing \"label\"")),
        };
        let id = optional_string(index, &mut map, "id")?;
        let shortcut = optional_string(index, &mut map, "shortcut")?;
        let icon = optional_string(index, &mut map, "icon")?.map(MenuIcon::Class);
        let disabled = map.remove("disabled").is_some_and(|v| is_truthy(&v));

        Ok(Self { label, id, disabled, icon, shortcut, extra: map })
    }
}

fn optional_string(
    index: usize,
    map: &mut Map<String, Value>,
    field: &str,
) -> Result<Option<String>, RclickError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(RclickError::invalid_item(index, format!("\"{field}\" must be a string"))),
    }
}

/// JSON truthiness: `false`, `null`, `0`, `NaN` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// MenuItem
// ============================================================================

/// An entry in a menu.
#[derive(Debug, Clone)]
pub enum MenuItem<N = ()> {
    /// A selectable action.
    Action(MenuAction<N>),
    /// A visual separator line.
    Divider,
}

impl<N> MenuItem<N> {
    /// Create an enabled action item.
    pub fn action(label: impl Into<String>) -> Self {
        Self::Action(MenuAction::new(label))
    }

    /// Create a divider item.
    pub fn divider() -> Self {
        Self::Divider
    }

    /// Check if this item is a divider.
    pub fn is_divider(&self) -> bool {
        matches!(self, Self::Divider)
    }

    /// Check if this item is a disabled action. Dividers are never disabled.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Action(action) if action.disabled)
    }

    /// Check if this item is selectable (not a divider, not disabled).
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Action(action) if !action.disabled)
    }

    /// Get the action, if this is one.
    pub fn as_action(&self) -> Option<&MenuAction<N>> {
        match self {
            Self::Action(action) => Some(action),
            Self::Divider => None,
        }
    }

    /// Build an item from one entry of a declarative menu description.
    ///
    /// An entry is a divider only if it carries `"type": "divider"` exactly;
    /// everything else must be an action with a string label.
    pub fn from_value(index: usize, value: Value) -> Result<Self, RclickError> {
        let Value::Object(map) = value else {
            return Err(RclickError::invalid_item(index, "entry must be an object"));
        };
        if map.get(TYPE_FIELD).and_then(Value::as_str) == Some(DIVIDER_TYPE) {
            return Ok(Self::Divider);
        }
        MenuAction::from_map(index, map).map(Self::Action)
    }

    /// Serialize back into the declarative JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Action(action) => action.to_value(),
            Self::Divider => {
                let mut map = Map::new();
                map.insert(TYPE_FIELD.into(), Value::String(DIVIDER_TYPE.into()));
                Value::Object(map)
            }
        }
    }
}

impl<N> From<MenuAction<N>> for MenuItem<N> {
    fn from(action: MenuAction<N>) -> Self {
        Self::Action(action)
    }
}

/// Parse a JSON array of entries into menu items.
pub fn parse_menu<N>(json: &str) -> Result<Vec<MenuItem<N>>, RclickError> {
    let value: Value = serde_json::from_str(json)?;
    items_from_value(value)
}

/// Convert an already-parsed JSON array into menu items.
pub fn items_from_value<N>(value: Value) -> Result<Vec<MenuItem<N>>, RclickError> {
    let Value::Array(entries) = value else {
        return Err(RclickError::invalid_item(0, "menu must be a JSON array"));
    };
    entries.into_iter().enumerate().map(|(index, entry)| MenuItem::from_value(index, entry)).collect()
}

// ============================================================================
// ItemIds
// ============================================================================

/// Deterministic element ids for one menu instance.
///
/// The instance part is fixed at construction, so ids stay the same across
/// re-renders and only depend on the item's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIds {
    prefix: String,
    instance: Uuid,
}

impl ItemIds {
    /// Create ids for a fresh instance.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_instance(prefix, Uuid::new_v4())
    }

    /// Create ids for a known instance.
    pub fn with_instance(prefix: impl Into<String>, instance: Uuid) -> Self {
        Self { prefix: prefix.into(), instance }
    }

    /// The per-instance id.
    pub fn instance(&self) -> Uuid {
        self.instance
    }

    /// Id of the menu root.
    pub fn menu_id(&self) -> String {
        format!("{}-{}", self.prefix, self.instance.simple())
    }

    /// Id of the item at `index`.
    pub fn item_id(&self, index: usize) -> String {
        format!("{}-{}-item-{}", self.prefix, self.instance.simple(), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_classification() {
        let divider = MenuItem::<()>::divider();
        assert!(divider.is_divider());
        assert!(!divider.is_disabled());
        assert!(!divider.is_selectable());

        let action = MenuItem::<()>::action("Copy");
        assert!(action.is_selectable());

        let disabled = MenuItem::<()>::Action(MenuAction::new("Delete").disabled(true));
        assert!(disabled.is_disabled());
        assert!(!disabled.is_selectable());
    }

    #[test]
    fn test_parse_menu() {
        let items: Vec<MenuItem> = parse_menu(
            r#"[{"label":"Copy","shortcut":"Ctrl+C","icon":"icon-copy"},
                {"type":"divider"},
                {"label":"Delete","disabled":true,"danger":true}]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 3);
        let copy = items[0].as_action().unwrap();
        assert_eq!(copy.label, "Copy");
        assert_eq!(copy.shortcut.as_deref(), Some("Ctrl+C"));
        assert!(matches!(copy.icon, Some(MenuIcon::Class(ref c)) if c == "icon-copy"));
        assert!(items[1].is_divider());
        let delete = items[2].as_action().unwrap();
        assert!(delete.disabled);
        assert_eq!(delete.extra.get("danger"), Some(&json!(true)));
    }

    #[test]
    fn test_divider_requires_exact_discriminant() {
        let item = MenuItem::<()>::from_value(0, json!({"type": "Divider", "label": "x"})).unwrap();
        let action = item.as_action().unwrap();
        assert_eq!(action.extra.get("type"), Some(&json!("Divider")));

        let item = MenuItem::<()>::from_value(0, json!({"type": "divider", "label": "x"})).unwrap();
        assert!(item.is_divider());
    }

    #[test]
    fn test_disabled_truthiness() {
        for (value, expected) in [
            (json!(true), true),
            (json!(1), true),
            (json!("yes"), true),
            (json!(false), false),
            (json!(0), false),
            (json!(""), false),
            (json!(null), false),
        ] {
            let item = MenuItem::<()>::from_value(0, json!({"label": "A", "disabled": value})).unwrap();
            assert_eq!(item.is_disabled(), expected, "disabled: {value}");
        }
    }

    #[test]
    fn test_invalid_entries() {
        let err = parse_menu::<()>(r#"[{"label":"ok"},{"shortcut":"x"}]"#).unwrap_err();
        assert!(matches!(err, RclickError::InvalidItem { index: 1, .. }));

        let err = parse_menu::<()>(r#"[{"label":3}]"#).unwrap_err();
        assert!(matches!(err, RclickError::InvalidItem { index: 0, .. }));

        let err = parse_menu::<()>(r#"["Copy"]"#).unwrap_err();
        assert!(matches!(err, RclickError::InvalidItem { .. }));

        let err = parse_menu::<()>(r#"{"label":"Copy"}"#).unwrap_err();
        assert!(matches!(err, RclickError::InvalidItem { .. }));

        let err = parse_menu::<()>("[").unwrap_err();
        assert!(matches!(err, RclickError::Json { .. }));
    }

    #[test]
    fn test_key_falls_back_to_label() {
        let plain = MenuAction::<()>::new("Copy");
        assert_eq!(plain.key(), "Copy");
        let with_id = MenuAction::<()>::new("Copy").id("copy-selection");
        assert_eq!(with_id.key(), "copy-selection");
    }

    #[test]
    fn test_to_value_keeps_extra_fields() {
        let action = MenuAction::<()>::new("Open").icon("icon-open").extra("path", "/tmp");
        assert_eq!(action.to_value(), json!({"label": "Open", "icon": "icon-open", "path": "/tmp"}));
        assert_eq!(MenuItem::<()>::Divider.to_value(), json!({"type": "divider"}));
    }

    #[test]
    fn test_icon_resolution() {
        let class: MenuIcon<u32> = "icon-cut".into();
        assert_eq!(class.resolve(), ResolvedIcon::Class("icon-cut".into()));

        let node = MenuIcon::Node(7u32);
        assert_eq!(node.resolve(), ResolvedIcon::Node(7));

        let component = MenuIcon::component(|| 42u32);
        assert_eq!(component.resolve(), ResolvedIcon::Node(42));
    }

    #[test]
    fn test_item_ids_are_stable() {
        let ids = ItemIds::with_instance("rclick", Uuid::nil());
        assert_eq!(ids.item_id(2), "rclick-00000000000000000000000000000000-item-2");
        assert_eq!(ids.item_id(2), ids.clone().item_id(2));
        assert_eq!(ids.menu_id(), "rclick-00000000000000000000000000000000");

        let other = ItemIds::new("rclick");
        assert_ne!(other.item_id(0), ItemIds::new("rclick").item_id(0));
    }
}
