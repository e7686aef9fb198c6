//! Abstractions over the host environment.
//!
//! The menu never talks to a concrete windowing system. Instead the host
//! supplies [`EventTarget`]s to register listeners on, [`Region`]s that can
//! answer containment queries, and a [`MenuRoot`] that can be measured once it
//! has been rendered.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::geometry::{Point, Size};
use crate::observable::Subscription;

/// Identifier of a node in the host's visual tree.
///
/// Events carry the id of the node they originated from so the menu can tell
/// whether they happened inside an exempt region.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Convert the `NodeId` into the underlying integer.
    pub const fn into_raw(self) -> u64 {
        self.0
    }

    /// Construct a `NodeId` from the underlying integer.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmtr)
    }
}

/// Identifier returned by [`EventTarget::add_listener`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Convert the `ListenerId` into the underlying integer.
    pub const fn into_raw(self) -> u64 {
        self.0
    }

    /// Construct a `ListenerId` from the underlying integer.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ListenerId {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmtr)
    }
}

/// Kinds of host events the menu listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Contextual-activation gesture (secondary click).
    ContextMenu,
    /// Primary pointer click.
    Click,
    /// Any scroll, anywhere.
    Scroll,
    /// The window or viewport was resized.
    Resize,
}

/// How a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Run during the capture phase, before target and bubble listeners.
    pub capture: bool,
    /// The listener never prevents default handling.
    pub passive: bool,
}

impl ListenerOptions {
    /// Capture-phase listener.
    pub const CAPTURE: Self = Self { capture: true, passive: false };
    /// Passive listener.
    pub const PASSIVE: Self = Self { capture: false, passive: true };
}

/// An event delivered by the host to a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// What happened.
    pub kind: EventKind,
    /// Pointer position in viewport coordinates, if meaningful.
    pub position: Point,
    /// Node the event originated from, when the host knows it.
    pub origin: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl HostEvent {
    /// Create an event of the given kind at the given position.
    pub fn new(kind: EventKind, position: Point) -> Self {
        Self { kind, position, origin: None, default_prevented: false, propagation_stopped: false }
    }

    /// Set the originating node.
    pub fn with_origin(mut self, origin: NodeId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Suppress the host's default handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching further listeners.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether a listener called [`HostEvent::prevent_default`].
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether a listener called [`HostEvent::stop_propagation`].
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Listener callback type.
pub type Listener = Rc<dyn Fn(&mut HostEvent)>;

/// Something listeners can be attached to: a container region or the
/// ambient environment (the whole window).
pub trait EventTarget {
    /// Register `listener` for events of `kind`.
    fn add_listener(&self, kind: EventKind, options: ListenerOptions, listener: Listener)
        -> ListenerId;

    /// Remove a listener previously returned by [`EventTarget::add_listener`].
    ///
    /// Removing an unknown id must be a no-op.
    fn remove_listener(&self, id: ListenerId);
}

/// A subtree of the host's visual tree.
pub trait Region {
    /// Whether `node` lies within this region.
    fn contains(&self, node: NodeId) -> bool;
}

impl<F: Fn(NodeId) -> bool> Region for F {
    fn contains(&self, node: NodeId) -> bool {
        self(node)
    }
}

/// The rendered root of an open menu.
///
/// Only exists after the host has rendered the menu; measuring before that is
/// impossible, which is why opening is split into `request_open` and
/// `on_rendered`.
pub trait MenuRoot: Region {
    /// Current rendered size of the menu.
    fn measure(&self) -> Size;

    /// Call `on_change` whenever the rendered size changes.
    ///
    /// Dropping the returned subscription must stop further calls.
    fn observe_size(&self, on_change: Box<dyn Fn(Size)>) -> Subscription;
}

// ============================================================================
// EventRegistry
// ============================================================================

struct Registered {
    id: ListenerId,
    kind: EventKind,
    options: ListenerOptions,
    listener: Listener,
}

/// In-memory [`EventTarget`] for hosts that route their own input.
///
/// Toolkit adapters forward native events through [`dispatch`], which gives
/// listeners the same capture/target/bubble ordering a DOM would.
#[derive(Default)]
pub struct EventRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Registered>>,
}

impl EventRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of registered listeners of every kind.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of registered listeners for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().iter().filter(|l| l.kind == kind).count()
    }

    /// Registration options of every listener for `kind`, in order.
    pub fn options_for(&self, kind: EventKind) -> Vec<ListenerOptions> {
        self.listeners.borrow().iter().filter(|l| l.kind == kind).map(|l| l.options).collect()
    }

    /// Run matching listeners. `capture` selects one phase; `None` runs both,
    /// as listeners on the target itself do.
    fn run(&self, event: &mut HostEvent, capture: Option<bool>) {
        // Snapshot so listeners may register or remove listeners while running.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == event.kind && capture.map_or(true, |c| l.options.capture == c))
            .map(|l| l.listener.clone())
            .collect();
        for listener in listeners {
            if event.is_propagation_stopped() {
                return;
            }
            listener(event);
        }
    }
}

impl EventTarget for EventRegistry {
    fn add_listener(&self, kind: EventKind, options: ListenerOptions, listener: Listener) -> ListenerId {
        let id = ListenerId::from_raw(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push(Registered { id, kind, options, listener });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry").field("listeners", &self.listener_count()).finish()
    }
}

/// Deliver `event`: environment capture listeners first, then the target's
/// own listeners, then environment bubble listeners. Stops as soon as a
/// listener stops propagation.
pub fn dispatch(
    environment: &EventRegistry,
    target: Option<&EventRegistry>,
    mut event: HostEvent,
) -> HostEvent {
    environment.run(&mut event, Some(true));
    if let Some(target) = target {
        if !event.is_propagation_stopped() {
            target.run(&mut event, None);
        }
    }
    if !event.is_propagation_stopped() {
        environment.run(&mut event, Some(false));
    }
    event
}
