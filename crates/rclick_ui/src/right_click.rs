//! Right-click menu view for GPUI windows.
//!
//! [`RightClick`] wraps some content and shows a [`ContextMenu`] when the
//! content is right-clicked. GPUI input is translated into host events and
//! delivered through an [`EventRegistry`], so the menu sees the same
//! capture/target/bubble ordering it would in any other host.
//!
//! The menu is drawn in a deferred, anchored layer at the position the core
//! resolves, sized from the item list the same way it is laid out.
//!
//! While the menu is open, every mouse-down and scroll in the window is seen
//! in GPUI's capture phase, before any element can stop it, and delivered to
//! the menu as an environment event.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gpui::{
    anchored, canvas, deferred, div, point, prelude::*, px, AnyElement, AnyView, App, Context,
    DispatchPhase, EventEmitter, FocusHandle, Focusable, IntoElement, MouseButton,
    MouseDownEvent, MouseMoveEvent, ParentElement, Pixels, Render, ScrollWheelEvent,
    SharedString, Styled, Window,
};
use smallvec::SmallVec;

use rclick_core::{
    dispatch, AccessibilityNode, ContextMenu, Emitter, EventKind, EventRegistry, EventTarget,
    HostEvent, Key, MenuAction, MenuConfig, MenuIcon, MenuItem, MenuRoot, NodeId, Point, Region,
    ResolvedIcon, Size, Subscription, ViewportSource,
};

use crate::icon::{Icon, IconName, IconSize};
use crate::key_bindings::context_menu::{
    ConfirmItem, DismissMenu, SelectFirstItem, SelectLastItem, SelectNextItem, SelectPreviousItem,
};
use crate::key_bindings::CONTEXT_MENU_KEY_CONTEXT;
use crate::RclickTheme;

/// Menu width in pixels.
pub const MENU_WIDTH: f32 = 200.0;
/// Height of an action row.
pub const ITEM_HEIGHT: f32 = 28.0;
/// Height of a divider including its vertical margin.
pub const SEPARATOR_HEIGHT: f32 = 9.0;
/// Vertical padding inside the menu, top and bottom combined.
pub const MENU_PADDING: f32 = 8.0;
const MENU_BORDER: f32 = 1.0;

/// Origin attached to every event raised inside the menu layer.
const MENU_NODE: NodeId = NodeId::from_raw(1);

/// Size the menu will occupy once laid out.
pub fn estimate_menu_size<N>(items: &[MenuItem<N>]) -> Size {
    let rows: f32 = items
        .iter()
        .map(|item| if item.is_divider() { SEPARATOR_HEIGHT } else { ITEM_HEIGHT })
        .sum();
    Size::new(MENU_WIDTH, rows + MENU_PADDING + MENU_BORDER * 2.0)
}

fn to_point(position: gpui::Point<Pixels>) -> Point {
    Point::new(f32::from(position.x), f32::from(position.y))
}

fn to_size(size: gpui::Size<Pixels>) -> Size {
    Size::new(f32::from(size.width), f32::from(size.height))
}

fn icon_name(icon: &MenuIcon<IconName>) -> Option<IconName> {
    match icon.resolve() {
        ResolvedIcon::Class(class) => {
            let name = IconName::from_name(&class);
            if name.is_none() {
                tracing::trace!(class = %class, "Unknown menu icon class");
            }
            name
        }
        ResolvedIcon::Node(name) => Some(name),
    }
}

// ============================================================================
// MenuSurface
// ============================================================================

/// The rendered menu layer as the core sees it.
///
/// The size is derived from the item list with the same constants the layer
/// is laid out with, not read back from the painted element. It is updated
/// each time the open menu is rendered.
struct MenuSurface {
    size: Cell<Size>,
    resized: Emitter<Size>,
}

impl MenuSurface {
    fn new() -> Self {
        Self { size: Cell::new(Size::default()), resized: Emitter::new() }
    }

    /// Re-measure for `items`, notifying observers if the size changed.
    fn update<N>(&self, items: &[MenuItem<N>]) {
        let size = estimate_menu_size(items);
        if self.size.replace(size) != size {
            self.resized.emit(&size);
        }
    }
}

impl Region for MenuSurface {
    fn contains(&self, node: NodeId) -> bool {
        node == MENU_NODE
    }
}

impl MenuRoot for MenuSurface {
    fn measure(&self) -> Size {
        self.size.get()
    }

    fn observe_size(&self, on_change: Box<dyn Fn(Size)>) -> Subscription {
        self.resized.subscribe(move |size| on_change(*size))
    }
}

// ============================================================================
// RightClickEvent
// ============================================================================

/// Events emitted by the RightClick component.
#[derive(Debug, Clone)]
pub enum RightClickEvent {
    /// The menu opened.
    Opened,
    /// An item was chosen.
    Selected(MenuAction<IconName>),
    /// The menu closed, with or without a selection.
    Closed,
}

// ============================================================================
// MenuHost
// ============================================================================

/// Toolkit-independent half of [`RightClick`]: the menu, its event targets
/// and the queue of events waiting to be emitted.
struct MenuHost {
    menu: ContextMenu<IconName>,
    surface: Rc<MenuSurface>,
    environment: Rc<EventRegistry>,
    container: Rc<EventRegistry>,
    window_size: Rc<Cell<Size>>,
    pending: Rc<RefCell<SmallVec<[RightClickEvent; 2]>>>,
    _subscriptions: Vec<Subscription>,
}

impl MenuHost {
    fn new(items: Vec<MenuItem<IconName>>, config: MenuConfig, window_size: Size) -> Self {
        let environment = EventRegistry::new();
        let container = EventRegistry::new();
        let window_size = Rc::new(Cell::new(window_size));

        let viewport = Rc::new(ViewportSource::new(window_size.get()));
        let measured = window_size.clone();
        viewport.bind(environment.clone(), move || measured.get());

        let menu = ContextMenu::new(items, viewport, config);
        let container_target: Rc<dyn EventTarget> = container.clone();
        menu.attach(Some(container_target), environment.clone());

        let pending: Rc<RefCell<SmallVec<[RightClickEvent; 2]>>> = Rc::default();
        let sink = pending.clone();
        let visible = menu.subscribe_visible(move |visible| {
            let event = if visible { RightClickEvent::Opened } else { RightClickEvent::Closed };
            sink.borrow_mut().push(event);
        });
        let sink = pending.clone();
        let selected = menu.subscribe_selected(move |action| {
            sink.borrow_mut().push(RightClickEvent::Selected(action.clone()));
        });

        Self {
            menu,
            surface: Rc::new(MenuSurface::new()),
            environment,
            container,
            window_size,
            pending,
            _subscriptions: vec![visible, selected],
        }
    }

    /// Deliver an event raised over the wrapped content.
    fn content_event(&self, kind: EventKind, position: Point) -> HostEvent {
        dispatch(&self.environment, Some(&self.container), HostEvent::new(kind, position))
    }

    /// Deliver an event raised inside the menu layer.
    fn menu_event(&self, kind: EventKind, position: Point) -> HostEvent {
        dispatch(&self.environment, None, HostEvent::new(kind, position).with_origin(MENU_NODE))
    }

    /// Whether `position` falls on the open menu layer.
    fn menu_contains(&self, position: Point) -> bool {
        if !self.menu.visible() {
            return false;
        }
        let origin = self.menu.position();
        let size = estimate_menu_size(&self.menu.items());
        position.x >= origin.x
            && position.x < origin.x + size.width
            && position.y >= origin.y
            && position.y < origin.y + size.height
    }

    /// Deliver an event seen at window level before any element handled it.
    /// Events over the menu layer carry its origin and never dismiss.
    fn window_event(&self, kind: EventKind, position: Point) -> HostEvent {
        if self.menu_contains(position) {
            return self.menu_event(kind, position);
        }
        dispatch(&self.environment, None, HostEvent::new(kind, position))
    }

    /// Record the current window size. Returns whether it changed.
    fn window_resized(&self, size: Size) -> bool {
        if self.window_size.replace(size) == size {
            return false;
        }
        tracing::trace!(width = size.width, height = size.height, "Window resized");
        dispatch(&self.environment, None, HostEvent::new(EventKind::Resize, Point::default()));
        true
    }

    /// The menu layer is being drawn with the current items.
    fn rendered(&self) {
        if !self.menu.visible() {
            return;
        }
        self.surface.update(&self.menu.items());
        let root: Rc<dyn MenuRoot> = self.surface.clone();
        self.menu.on_rendered(Some(root));
    }

    fn drain(&self) -> SmallVec<[RightClickEvent; 2]> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

// ============================================================================
// RightClick
// ============================================================================

/// A view that shows a context menu when its content is right-clicked.
pub struct RightClick {
    host: MenuHost,
    focus_handle: FocusHandle,
    content: Option<AnyView>,
}

impl RightClick {
    /// Create a menu over `items` using the global [`MenuConfig`], or the
    /// default configuration when none is set.
    pub fn new(items: Vec<MenuItem<IconName>>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let config = cx.try_global::<MenuConfig>().cloned().unwrap_or_default();
        Self::with_config(items, config, window, cx)
    }

    /// Create a menu over `items` with an explicit configuration.
    pub fn with_config(
        items: Vec<MenuItem<IconName>>,
        config: MenuConfig,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let host = MenuHost::new(items, config, to_size(window.viewport_size()));
        Self { host, focus_handle: cx.focus_handle(), content: None }
    }

    /// Builder: set the view the menu is attached to.
    pub fn content(mut self, content: impl Into<AnyView>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replace the menu items.
    pub fn set_items(&mut self, items: Vec<MenuItem<IconName>>, cx: &mut Context<Self>) {
        self.host.menu.set_items(items);
        cx.notify();
    }

    /// Close the menu if it is open.
    pub fn dismiss(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.host.menu.close();
        self.after_input(window, cx);
    }

    pub fn is_open(&self) -> bool {
        self.host.menu.visible()
    }

    /// The underlying menu.
    pub fn menu(&self) -> &ContextMenu<IconName> {
        &self.host.menu
    }

    /// Snapshot of the menu's accessibility tree.
    pub fn accessibility(&self) -> AccessibilityNode {
        self.host.menu.accessibility()
    }

    /// Emit whatever the last input produced and focus a freshly opened menu.
    fn emit_pending(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        for event in self.host.drain() {
            if matches!(event, RightClickEvent::Opened) {
                window.focus(&self.focus_handle, cx);
            }
            cx.emit(event);
        }
    }

    fn after_input(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.emit_pending(window, cx);
        cx.notify();
    }

    fn on_secondary_down(&mut self, event: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.host.content_event(EventKind::ContextMenu, to_point(event.position));
        self.after_input(window, cx);
    }

    fn on_window_event(
        &mut self,
        kind: EventKind,
        position: gpui::Point<Pixels>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !self.host.menu.visible() {
            return;
        }
        self.host.window_event(kind, to_point(position));
        self.after_input(window, cx);
    }

    /// Canvas that, when painted, registers capture-phase listeners for every
    /// mouse-down and scroll in the window. Only painted while the menu is open.
    fn dismissal_listener(&self, cx: &Context<Self>) -> impl IntoElement {
        let this = cx.entity().downgrade();
        canvas(
            |_, _, _| {},
            move |_, _, window, _| {
                let on_down = this.clone();
                window.on_mouse_event(move |event: &MouseDownEvent, phase, window, cx| {
                    if phase != DispatchPhase::Capture {
                        return;
                    }
                    let kind = match event.button {
                        MouseButton::Left => EventKind::Click,
                        MouseButton::Right => EventKind::ContextMenu,
                        _ => return,
                    };
                    let _ = on_down.update(cx, |this, cx| {
                        this.on_window_event(kind, event.position, window, cx);
                    });
                });
                window.on_mouse_event(move |event: &ScrollWheelEvent, phase, window, cx| {
                    if phase != DispatchPhase::Capture {
                        return;
                    }
                    let _ = this.update(cx, |this, cx| {
                        this.on_window_event(EventKind::Scroll, event.position, window, cx);
                    });
                });
            },
        )
        .absolute()
        .size_full()
    }

    fn key(&mut self, key: Key, window: &mut Window, cx: &mut Context<Self>) {
        if self.host.menu.handle_key(key).is_handled() {
            self.after_input(window, cx);
        }
    }

    fn render_item(
        &self,
        index: usize,
        item: &MenuItem<IconName>,
        theme: &RclickTheme,
        cx: &Context<Self>,
    ) -> AnyElement {
        let id = SharedString::from(self.host.menu.item_id(index));
        let action = match item {
            MenuItem::Divider => {
                return div()
                    .id(id)
                    .h(px(1.0))
                    .w_full()
                    .my(px(4.0))
                    .bg(theme.colors.border)
                    .into_any_element();
            }
            MenuItem::Action(action) => action,
        };

        let is_active = self.host.menu.active() == Some(index);
        let is_disabled = action.disabled;
        let text_color = if is_disabled { theme.colors.text_muted } else { theme.colors.text };
        let icon = action.icon.as_ref().and_then(icon_name);

        div()
            .id(id)
            .h(px(ITEM_HEIGHT))
            .w_full()
            .flex()
            .items_center()
            .px(px(8.0))
            .gap(px(8.0))
            .rounded(px(4.0))
            .when(!is_disabled, |d| d.cursor_pointer())
            .when(is_active, |d| d.bg(theme.colors.item_active))
            .when(!is_active && !is_disabled, |d| {
                let hover = theme.colors.item_hover;
                d.hover(move |s| s.bg(hover))
            })
            .on_mouse_move(cx.listener(move |this, _: &MouseMoveEvent, _window, cx| {
                if this.host.menu.hover_item(index) {
                    cx.notify();
                }
            }))
            .when(!is_disabled, |d| {
                d.on_click(cx.listener(move |this, _, window, cx| {
                    this.host.menu.click_item(index);
                    this.after_input(window, cx);
                }))
            })
            .child(div().w(px(16.0)).h(px(16.0)).flex().items_center().justify_center().when_some(
                icon,
                |d, icon| d.child(Icon::new(icon).size(IconSize::Small).color(text_color)),
            ))
            .child(
                div()
                    .flex_1()
                    .text_sm()
                    .text_color(text_color)
                    .child(SharedString::from(action.label.clone())),
            )
            .when_some(action.shortcut.clone().map(SharedString::from), |d, shortcut| {
                d.child(div().text_xs().text_color(theme.colors.text_muted).child(shortcut))
            })
            .into_any_element()
    }

    fn render_menu(&self, theme: &RclickTheme, cx: &Context<Self>) -> impl IntoElement {
        let position = self.host.menu.position();
        let items: Vec<AnyElement> = self
            .host
            .menu
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| self.render_item(index, item, theme, cx))
            .collect();

        deferred(
            anchored().position(point(px(position.x), px(position.y))).child(
                div()
                    .id(SharedString::from(self.host.menu.menu_id()))
                    .key_context(CONTEXT_MENU_KEY_CONTEXT)
                    .track_focus(&self.focus_handle)
                    .occlude()
                    .w(px(MENU_WIDTH))
                    .py(px(MENU_PADDING / 2.0))
                    .bg(theme.colors.elevated_surface)
                    .border_1()
                    .border_color(theme.colors.border)
                    .rounded(px(6.0))
                    .shadow_lg()
                    .on_action(cx.listener(|this, _: &SelectNextItem, window, cx| {
                        this.key(Key::ArrowDown, window, cx);
                    }))
                    .on_action(cx.listener(|this, _: &SelectPreviousItem, window, cx| {
                        this.key(Key::ArrowUp, window, cx);
                    }))
                    .on_action(cx.listener(|this, _: &SelectFirstItem, window, cx| {
                        this.key(Key::Home, window, cx);
                    }))
                    .on_action(cx.listener(|this, _: &SelectLastItem, window, cx| {
                        this.key(Key::End, window, cx);
                    }))
                    .on_action(cx.listener(|this, _: &ConfirmItem, window, cx| {
                        this.key(Key::Enter, window, cx);
                    }))
                    .on_action(cx.listener(|this, _: &DismissMenu, window, cx| {
                        this.key(Key::Escape, window, cx);
                    }))
                    // The window listener already saw these; keep them from
                    // reaching the content underneath.
                    .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                    .on_mouse_down(MouseButton::Right, |_, _, cx| cx.stop_propagation())
                    .children(items),
            ),
        )
        .with_priority(1)
    }
}

impl EventEmitter<RightClickEvent> for RightClick {}

impl Focusable for RightClick {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for RightClick {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.host.window_resized(to_size(window.viewport_size())) {
            self.emit_pending(window, cx);
        }
        self.host.rendered();

        let theme = cx.global::<RclickTheme>().clone();
        let visible = self.host.menu.visible();
        let menu = visible.then(|| self.render_menu(&theme, cx));
        let listener = visible.then(|| self.dismissal_listener(cx));

        div()
            .id("right-click")
            .size_full()
            .relative()
            .on_mouse_down(MouseButton::Right, cx.listener(Self::on_secondary_down))
            .when_some(listener, |d, listener| d.child(listener))
            .when_some(self.content.clone(), |d, content| d.child(content))
            .when_some(menu, |d, menu| d.child(menu))
    }
}
