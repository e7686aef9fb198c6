//! The `ContextMenu`: items, activation, geometry and navigation wired together.
//!
//! Hosts drive it with three kinds of input:
//!
//! - events, through the listeners registered by [`ContextMenu::attach`]
//! - render notifications, through [`ContextMenu::on_rendered`]
//! - keys and pointer hits on items, through [`ContextMenu::handle_key`],
//!   [`ContextMenu::hover_item`] and [`ContextMenu::click_item`]
//!
//! and read back the visible state from its observables.

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::accessibility::AccessibilityNode;
use crate::activation::{ActivationController, ActivationState};
use crate::config::MenuConfig;
use crate::geometry::{MeasurePhase, MenuGeometry, Point, Size};
use crate::host::{EventTarget, MenuRoot, NodeId, Region};
use crate::item::{ItemIds, MenuAction, MenuItem};
use crate::keys::{Key, KeyOutcome};
use crate::navigation::Navigation;
use crate::observable::{Emitter, Observable, Subscription};
use crate::viewport::ViewportSource;

type RootSlot = Rc<RefCell<Option<Rc<dyn MenuRoot>>>>;

struct Shared<N: 'static> {
    items: RefCell<Vec<MenuItem<N>>>,
    controller: ActivationController,
    geometry: MenuGeometry,
    navigation: RefCell<Navigation>,
    ids: ItemIds,
    viewport: Rc<ViewportSource>,
    config: MenuConfig,
    active: Observable<Option<usize>>,
    placement: Observable<Option<Point>>,
    selected: Emitter<MenuAction<N>>,
    root: RootSlot,
    open: Cell<bool>,
}

impl<N: Clone + 'static> Shared<N> {
    fn on_activation_changed(&self, state: &ActivationState) {
        match (self.open.get(), state.visible) {
            (false, true) => {
                self.open.set(true);
                let active = self.navigation.borrow_mut().open();
                self.active.set(active);
                self.placement.set(None);
                self.geometry.request_open();
                tracing::debug!(?active, x = state.cursor.x, y = state.cursor.y, "Menu opened");
            }
            (true, false) => {
                self.open.set(false);
                self.geometry.close();
                self.navigation.borrow_mut().clear();
                self.active.set(None);
                self.placement.set(None);
                let root = self.root.borrow_mut().take();
                drop(root);
                tracing::debug!("Menu closed");
            }
            (true, true) => self.update_placement(),
            (false, false) => {}
        }
    }

    fn update_placement(&self) {
        let placement = if self.open.get() && self.geometry.measured().is_some() {
            Some(self.geometry.placement(
                self.controller.cursor(),
                self.viewport.size(),
                self.config.viewport_margin,
            ))
        } else {
            None
        };
        if self.placement.set(placement) {
            tracing::trace!(?placement, "Menu placement updated");
        }
    }

    fn sync_active(&self) -> Option<usize> {
        let active = self.navigation.borrow().active();
        self.active.set(active);
        active
    }

    fn select(&self, index: usize) {
        let action = self.items.borrow().get(index).and_then(MenuItem::as_action).cloned();
        let Some(action) = action else {
            return;
        };
        tracing::debug!(index, label = %action.label, "Menu item selected");
        // Listeners observe the menu already closed.
        if self.config.close_on_select {
            self.controller.close();
        }
        self.selected.emit(&action);
    }
}

/// An accessible right-click menu over a list of items.
///
/// `N` is the host's node type for prebuilt or component icons; menus with
/// only class-name icons use the default `()`.
pub struct ContextMenu<N: 'static = ()> {
    shared: Rc<Shared<N>>,
    _subscriptions: Vec<Subscription>,
}

impl<N: Clone + 'static> ContextMenu<N> {
    /// Create a closed menu. Nothing listens for events until [`attach`].
    ///
    /// [`attach`]: ContextMenu::attach
    pub fn new(items: Vec<MenuItem<N>>, viewport: Rc<ViewportSource>, config: MenuConfig) -> Self {
        Self::with_ids(items, viewport, ItemIds::new(config.id_prefix.clone()), config)
    }

    /// Create a closed menu with a fixed id generator.
    pub fn with_ids(
        items: Vec<MenuItem<N>>,
        viewport: Rc<ViewportSource>,
        ids: ItemIds,
        config: MenuConfig,
    ) -> Self {
        let navigation = Navigation::new(&items).with_wrap(config.wrap);
        let root: RootSlot = Rc::new(RefCell::new(None));

        let controller = ActivationController::new(config.dismiss);
        let exempt_root = root.clone();
        controller.add_exempt(Rc::new(move |node: NodeId| {
            exempt_root.borrow().as_ref().is_some_and(|root| root.contains(node))
        }));

        let shared = Rc::new(Shared {
            items: RefCell::new(items),
            controller,
            geometry: MenuGeometry::new(),
            navigation: RefCell::new(navigation),
            ids,
            viewport,
            config,
            active: Observable::new(None),
            placement: Observable::new(None),
            selected: Emitter::new(),
            root,
            open: Cell::new(false),
        });

        let weak = Rc::downgrade(&shared);
        let subscriptions = vec![
            shared.controller.subscribe(with_shared(&weak, |shared, state: &ActivationState| {
                shared.on_activation_changed(state)
            })),
            shared.geometry.measured_observable().subscribe(with_shared(
                &weak,
                |shared, _: &Option<Size>| shared.update_placement(),
            )),
            shared
                .viewport
                .subscribe(with_shared(&weak, |shared, _: &Size| shared.update_placement())),
        ];

        Self { shared, _subscriptions: subscriptions }
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Listen for the activation gesture on `container` and dismissal signals
    /// on `environment`. A second call while attached is ignored.
    pub fn attach(&self, container: Option<Rc<dyn EventTarget>>, environment: Rc<dyn EventTarget>) {
        self.shared.controller.attach(container, environment);
    }

    /// Remove every listener registered by [`attach`](ContextMenu::attach).
    pub fn detach(&self) {
        self.shared.controller.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.shared.controller.is_attached()
    }

    /// Register an additional region whose events never dismiss the menu.
    pub fn add_exempt(&self, region: Rc<dyn Region>) {
        self.shared.controller.add_exempt(region);
    }

    /// The underlying activation controller, for hosts that deliver events
    /// themselves.
    pub fn controller(&self) -> &ActivationController {
        &self.shared.controller
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open at `cursor` without an activation gesture.
    pub fn open_at(&self, cursor: Point) {
        self.shared.controller.open_at(cursor);
    }

    /// Close without a selection.
    pub fn close(&self) {
        self.shared.controller.close();
    }

    /// The host finished rendering the open menu.
    ///
    /// The first call per opening with a root measures the menu and starts
    /// observing its size; later calls are ignored. While the root is stored,
    /// events originating inside it never dismiss the menu.
    pub fn on_rendered(&self, root: Option<Rc<dyn MenuRoot>>) {
        let shared = &self.shared;
        if !shared.open.get() || shared.geometry.phase() != MeasurePhase::AwaitingRender {
            return;
        }
        if let Some(root) = &root {
            *shared.root.borrow_mut() = Some(root.clone());
        }
        shared.geometry.on_rendered(root.as_deref());
    }

    /// Replace the items. The active item is kept if still selectable.
    pub fn set_items(&self, items: Vec<MenuItem<N>>) {
        let shared = &self.shared;
        shared.navigation.borrow_mut().set_items(&items);
        *shared.items.borrow_mut() = items;
        shared.sync_active();
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Offer a key press to the menu.
    pub fn handle_key(&self, key: Key) -> KeyOutcome {
        let shared = &self.shared;
        if !shared.open.get() {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::ArrowDown => {
                shared.navigation.borrow_mut().move_next();
                shared.sync_active();
            }
            Key::ArrowUp => {
                shared.navigation.borrow_mut().move_previous();
                shared.sync_active();
            }
            Key::Home => {
                shared.navigation.borrow_mut().jump_first();
                shared.sync_active();
            }
            Key::End => {
                shared.navigation.borrow_mut().jump_last();
                shared.sync_active();
            }
            key if key.is_confirm() => {
                let confirmed = shared.navigation.borrow().confirm();
                if let Some(index) = confirmed {
                    shared.select(index);
                }
            }
            Key::Escape | Key::Tab => shared.controller.close(),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// The pointer entered the item at `index`. Returns whether it became
    /// active.
    pub fn hover_item(&self, index: usize) -> bool {
        let shared = &self.shared;
        if !shared.open.get() {
            return false;
        }
        let changed = shared.navigation.borrow_mut().hover(index);
        if changed {
            shared.sync_active();
        }
        changed
    }

    /// The item at `index` was clicked. Returns whether a selection was made.
    pub fn click_item(&self, index: usize) -> bool {
        let shared = &self.shared;
        if !shared.open.get() {
            return false;
        }
        let activated = shared.navigation.borrow_mut().activate(index);
        let Some(index) = activated else {
            return false;
        };
        shared.sync_active();
        shared.select(index);
        true
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn visible(&self) -> bool {
        self.shared.controller.visible()
    }

    pub fn cursor(&self) -> Point {
        self.shared.controller.cursor()
    }

    pub fn active(&self) -> Option<usize> {
        self.shared.active.get()
    }

    /// Resolved top-left corner, available once the open menu is measured.
    pub fn placement(&self) -> Option<Point> {
        self.shared.placement.get()
    }

    /// Where to draw the menu right now: the resolved placement, or the
    /// clamped cursor while the first measurement is pending.
    pub fn position(&self) -> Point {
        let shared = &self.shared;
        shared.placement.get().unwrap_or_else(|| {
            shared.geometry.placement(
                shared.controller.cursor(),
                shared.viewport.size(),
                shared.config.viewport_margin,
            )
        })
    }

    pub fn items(&self) -> Ref<'_, [MenuItem<N>]> {
        Ref::map(self.shared.items.borrow(), Vec::as_slice)
    }

    pub fn config(&self) -> &MenuConfig {
        &self.shared.config
    }

    pub fn viewport(&self) -> &Rc<ViewportSource> {
        &self.shared.viewport
    }

    /// Element id for the menu root.
    pub fn menu_id(&self) -> String {
        self.shared.ids.menu_id()
    }

    /// Element id for the item at `index`.
    pub fn item_id(&self, index: usize) -> String {
        self.shared.ids.item_id(index)
    }

    /// Snapshot of the accessibility tree.
    pub fn accessibility(&self) -> AccessibilityNode {
        AccessibilityNode::menu(&self.shared.ids, &self.items(), self.active())
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Called with exactly the chosen action on every selection.
    pub fn subscribe_selected(&self, callback: impl Fn(&MenuAction<N>) + 'static) -> Subscription {
        self.shared.selected.subscribe(callback)
    }

    pub fn subscribe_visible(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        let last = Cell::new(self.visible());
        self.shared.controller.subscribe(move |state| {
            if last.replace(state.visible) != state.visible {
                callback(state.visible);
            }
        })
    }

    pub fn subscribe_active(&self, callback: impl Fn(Option<usize>) + 'static) -> Subscription {
        self.shared.active.subscribe(move |active| callback(*active))
    }

    pub fn subscribe_placement(&self, callback: impl Fn(Option<Point>) + 'static) -> Subscription {
        self.shared.placement.subscribe(move |placement| callback(*placement))
    }
}

fn with_shared<N: 'static, T: 'static>(
    weak: &Weak<Shared<N>>,
    f: impl Fn(&Shared<N>, &T) + 'static,
) -> impl Fn(&T) + 'static {
    let weak = weak.clone();
    move |value| {
        if let Some(shared) = weak.upgrade() {
            f(&shared, value);
        }
    }
}
