//! Visibility, cursor tracking and dismissal.
//!
//! The controller listens for the contextual-activation gesture on a container
//! and for dismissal signals on the surrounding environment. It knows nothing
//! about items or geometry; the `ContextMenu` reacts to its state.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::config::DismissConfig;
use crate::geometry::Point;
use crate::host::{EventKind, EventTarget, HostEvent, ListenerId, ListenerOptions, Region};
use crate::observable::{Observable, Subscription};

/// Whether the menu is shown, and where it was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivationState {
    pub visible: bool,
    /// Coordinates of the last activation gesture.
    pub cursor: Point,
}

struct Binding {
    container: Option<(Rc<dyn EventTarget>, ListenerId)>,
    environment: Rc<dyn EventTarget>,
    environment_listeners: SmallVec<[ListenerId; 4]>,
}

struct Inner {
    state: Observable<ActivationState>,
    exempt: RefCell<Vec<Rc<dyn Region>>>,
    binding: RefCell<Option<Binding>>,
    dismiss: DismissConfig,
}

impl Inner {
    fn handle_activation(&self, event: &mut HostEvent) {
        event.prevent_default();
        event.stop_propagation();
        tracing::debug!(x = event.position.x, y = event.position.y, "Context menu activated");
        self.state.set(ActivationState { visible: true, cursor: event.position });
    }

    fn handle_dismissal(&self, event: &HostEvent) {
        if !self.state.with(|state| state.visible) {
            return;
        }
        if let Some(origin) = event.origin {
            if self.exempt.borrow().iter().any(|region| region.contains(origin)) {
                tracing::trace!(?origin, kind = ?event.kind, "Dismissal ignored inside exempt region");
                return;
            }
        }
        tracing::debug!(kind = ?event.kind, "Context menu dismissed");
        self.close();
    }

    fn close(&self) {
        self.state.update(|state| state.visible = false);
    }
}

/// Owns the menu's visibility and the listeners that change it.
///
/// Listeners hold weak references to the controller state and are removed
/// when the controller drops.
pub struct ActivationController {
    inner: Rc<Inner>,
}

impl Default for ActivationController {
    fn default() -> Self {
        Self::new(DismissConfig::default())
    }
}

impl ActivationController {
    pub fn new(dismiss: DismissConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: Observable::new(ActivationState::default()),
                exempt: RefCell::new(Vec::new()),
                binding: RefCell::new(None),
                dismiss,
            }),
        }
    }

    /// Register the activation listener on `container` and the dismissal
    /// listeners on `environment`.
    ///
    /// A missing container only skips the activation listener. Attaching
    /// twice without a `detach` in between is ignored.
    pub fn attach(&self, container: Option<Rc<dyn EventTarget>>, environment: Rc<dyn EventTarget>) {
        if self.is_attached() {
            tracing::warn!("Context menu already attached; ignoring second attach");
            return;
        }

        let container = match container {
            Some(container) => {
                let weak = Rc::downgrade(&self.inner);
                let id = container.add_listener(
                    EventKind::ContextMenu,
                    ListenerOptions::default(),
                    Rc::new(move |event| {
                        if let Some(inner) = weak.upgrade() {
                            inner.handle_activation(event);
                        }
                    }),
                );
                Some((container, id))
            }
            None => {
                tracing::debug!("No container to bind; activation listener skipped");
                None
            }
        };

        let dismiss = self.inner.dismiss;
        let triggers = [
            (EventKind::Click, ListenerOptions::CAPTURE, dismiss.on_click),
            (EventKind::ContextMenu, ListenerOptions::CAPTURE, dismiss.on_context_menu),
            (EventKind::Scroll, ListenerOptions::CAPTURE, dismiss.on_scroll),
            (EventKind::Resize, ListenerOptions::PASSIVE, dismiss.on_resize),
        ];
        let environment_listeners = triggers
            .into_iter()
            .filter(|(_, _, enabled)| *enabled)
            .map(|(kind, options, _)| {
                let weak = Rc::downgrade(&self.inner);
                environment.add_listener(
                    kind,
                    options,
                    Rc::new(move |event| {
                        if let Some(inner) = weak.upgrade() {
                            inner.handle_dismissal(event);
                        }
                    }),
                )
            })
            .collect::<SmallVec<[ListenerId; 4]>>();

        tracing::debug!(
            container = container.is_some(),
            dismissal_listeners = environment_listeners.len(),
            "Context menu attached"
        );
        *self.inner.binding.borrow_mut() =
            Some(Binding { container, environment, environment_listeners });
    }

    /// Remove every registered listener. Safe to call when not attached.
    pub fn detach(&self) {
        let binding = self.inner.binding.borrow_mut().take();
        let Some(binding) = binding else {
            return;
        };
        if let Some((container, id)) = binding.container {
            container.remove_listener(id);
        }
        for id in binding.environment_listeners {
            binding.environment.remove_listener(id);
        }
        tracing::debug!("Context menu detached");
    }

    pub fn is_attached(&self) -> bool {
        self.inner.binding.borrow().is_some()
    }

    /// Open at `event.position` in response to an activation gesture.
    pub fn handle_activation(&self, event: &mut HostEvent) {
        self.inner.handle_activation(event);
    }

    /// Close in response to an environment signal, unless it originated
    /// inside an exempt region.
    pub fn handle_dismissal(&self, event: &HostEvent) {
        self.inner.handle_dismissal(event);
    }

    /// Register a region whose events never dismiss the menu.
    pub fn add_exempt(&self, region: Rc<dyn Region>) {
        self.inner.exempt.borrow_mut().push(region);
    }

    /// Open programmatically at `cursor`.
    pub fn open_at(&self, cursor: Point) {
        self.inner.state.set(ActivationState { visible: true, cursor });
    }

    /// Force the menu closed.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn state(&self) -> ActivationState {
        self.inner.state.get()
    }

    pub fn visible(&self) -> bool {
        self.state().visible
    }

    pub fn cursor(&self) -> Point {
        self.state().cursor
    }

    /// Observable form of the state.
    pub fn observable(&self) -> &Observable<ActivationState> {
        &self.inner.state
    }

    pub fn subscribe(&self, callback: impl Fn(&ActivationState) + 'static) -> Subscription {
        self.inner.state.subscribe(callback)
    }

    #[cfg(test)]
    fn downgrade(&self) -> std::rc::Weak<Inner> {
        Rc::downgrade(&self.inner)
    }
}

impl Drop for ActivationController {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NodeId;
    use crate::host::{dispatch, EventRegistry};
    use crate::testing::event;

    fn as_target(target: &Rc<EventRegistry>) -> Option<Rc<dyn EventTarget>> {
        Some(target.clone())
    }

    fn attached() -> (ActivationController, Rc<EventRegistry>, Rc<EventRegistry>) {
        let controller = ActivationController::default();
        let container = EventRegistry::new();
        let env = EventRegistry::new();
        controller.attach(as_target(&container), env.clone());
        (controller, container, env)
    }

    #[test]
    fn test_activation_opens_at_cursor() {
        let (controller, container, env) = attached();

        let delivered = dispatch(&env, Some(&container), event(EventKind::ContextMenu, 120.0, 45.0));

        assert!(delivered.is_default_prevented());
        assert!(delivered.is_propagation_stopped());
        assert!(controller.visible());
        assert_eq!(controller.cursor(), Point::new(120.0, 45.0));
    }

    #[test]
    fn test_repeated_activation_moves_menu() {
        let (controller, container, env) = attached();
        dispatch(&env, Some(&container), event(EventKind::ContextMenu, 10.0, 10.0));
        dispatch(&env, Some(&container), event(EventKind::ContextMenu, 300.0, 200.0));

        assert!(controller.visible());
        assert_eq!(controller.cursor(), Point::new(300.0, 200.0));
    }

    #[test]
    fn test_outside_signals_dismiss() {
        for kind in [EventKind::Click, EventKind::ContextMenu, EventKind::Scroll, EventKind::Resize] {
            let (controller, _container, env) = attached();
            controller.open_at(Point::new(5.0, 5.0));

            dispatch(&env, None, event(kind, 0.0, 0.0).with_origin(NodeId::from_raw(99)));
            assert!(!controller.visible(), "{kind:?} should dismiss");
        }
    }

    #[test]
    fn test_exempt_region_keeps_menu_open() {
        let (controller, _container, env) = attached();
        controller.add_exempt(Rc::new(|node: NodeId| node.into_raw() == 7));
        controller.open_at(Point::new(5.0, 5.0));

        dispatch(&env, None, event(EventKind::Click, 0.0, 0.0).with_origin(NodeId::from_raw(7)));
        assert!(controller.visible());

        // No origin is never exempt.
        dispatch(&env, None, event(EventKind::Click, 0.0, 0.0));
        assert!(!controller.visible());
    }

    #[test]
    fn test_listeners_use_capture_and_passive() {
        let (_controller, container, env) = attached();
        assert_eq!(container.options_for(EventKind::ContextMenu), vec![ListenerOptions::default()]);
        assert_eq!(env.options_for(EventKind::Click), vec![ListenerOptions::CAPTURE]);
        assert_eq!(env.options_for(EventKind::ContextMenu), vec![ListenerOptions::CAPTURE]);
        assert_eq!(env.options_for(EventKind::Scroll), vec![ListenerOptions::CAPTURE]);
        assert_eq!(env.options_for(EventKind::Resize), vec![ListenerOptions::PASSIVE]);
    }

    #[test]
    fn test_attach_detach_cycles_keep_listener_count_stable() {
        let controller = ActivationController::default();
        let container = EventRegistry::new();
        let env = EventRegistry::new();

        for _ in 0..5 {
            controller.attach(as_target(&container), env.clone());
            controller.attach(as_target(&container), env.clone());
            assert_eq!(container.listener_count(), 1);
            assert_eq!(env.listener_count(), 4);

            controller.detach();
            controller.detach();
            assert_eq!(container.listener_count(), 0);
            assert_eq!(env.listener_count(), 0);
        }
    }

    #[test]
    fn test_missing_container_still_binds_dismissal() {
        let controller = ActivationController::default();
        let env = EventRegistry::new();
        controller.attach(None, env.clone());

        assert!(controller.is_attached());
        assert_eq!(env.listener_count(), 4);
        controller.open_at(Point::new(1.0, 1.0));
        dispatch(&env, None, event(EventKind::Scroll, 0.0, 0.0));
        assert!(!controller.visible());
    }

    #[test]
    fn test_disabled_triggers_are_not_registered() {
        let controller = ActivationController::new(DismissConfig {
            on_scroll: false,
            on_resize: false,
            ..DismissConfig::default()
        });
        let env = EventRegistry::new();
        controller.attach(None, env.clone());

        assert_eq!(env.count(EventKind::Scroll), 0);
        assert_eq!(env.count(EventKind::Resize), 0);
        controller.open_at(Point::new(1.0, 1.0));
        dispatch(&env, None, event(EventKind::Scroll, 0.0, 0.0));
        assert!(controller.visible());
    }

    #[test]
    fn test_drop_detaches_and_releases() {
        let (controller, container, env) = attached();
        let weak = controller.downgrade();
        drop(controller);

        assert!(weak.upgrade().is_none());
        assert_eq!(container.listener_count(), 0);
        assert_eq!(env.listener_count(), 0);
    }
}
