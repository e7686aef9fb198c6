//! Live viewport size.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Size;
use crate::host::{EventKind, EventTarget, ListenerId, ListenerOptions};
use crate::observable::{Observable, Subscription};

/// The current available width and height, updated on resize.
///
/// Either push sizes in with [`ViewportSource::resize`] or [`bind`] it to an
/// environment so it re-measures on every resize event.
///
/// [`bind`]: ViewportSource::bind
pub struct ViewportSource {
    size: Observable<Size>,
    binding: RefCell<Option<(Rc<dyn EventTarget>, ListenerId)>>,
}

impl ViewportSource {
    /// Create a source with a known initial size.
    pub fn new(size: Size) -> Self {
        Self { size: Observable::new(size), binding: RefCell::new(None) }
    }

    /// Current size.
    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Report a new size.
    pub fn resize(&self, size: Size) {
        if self.size.set(size) {
            tracing::trace!(width = size.width, height = size.height, "Viewport resized");
        }
    }

    /// Observable form of the size, for derived computations.
    pub fn observable(&self) -> &Observable<Size> {
        &self.size
    }

    /// Call `callback` whenever the size changes.
    pub fn subscribe(&self, callback: impl Fn(&Size) + 'static) -> Subscription {
        self.size.subscribe(callback)
    }

    /// Measure now and again on every resize event from `environment`.
    ///
    /// Re-binding replaces the previous binding.
    pub fn bind(&self, environment: Rc<dyn EventTarget>, measure: impl Fn() -> Size + 'static) {
        self.unbind();
        self.resize(measure());

        let size = self.size.clone();
        let id = environment.add_listener(
            EventKind::Resize,
            ListenerOptions::PASSIVE,
            Rc::new(move |_event| {
                size.set(measure());
            }),
        );
        *self.binding.borrow_mut() = Some((environment, id));
    }

    /// Stop listening for resize events. Safe to call when unbound.
    pub fn unbind(&self) {
        let binding = self.binding.borrow_mut().take();
        if let Some((environment, id)) = binding {
            environment.remove_listener(id);
        }
    }

    /// Whether a resize listener is registered.
    pub fn is_bound(&self) -> bool {
        self.binding.borrow().is_some()
    }
}

impl Drop for ViewportSource {
    fn drop(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{dispatch, EventRegistry};
    use crate::testing::event;
    use std::cell::Cell;

    #[test]
    fn test_resize_updates_subscribers() {
        let viewport = ViewportSource::new(Size::new(800.0, 600.0));
        let seen = Rc::new(Cell::new(Size::default()));
        let sink = seen.clone();
        let _sub = viewport.subscribe(move |size| sink.set(*size));

        viewport.resize(Size::new(1024.0, 768.0));
        assert_eq!(seen.get(), Size::new(1024.0, 768.0));
        assert_eq!(viewport.size(), Size::new(1024.0, 768.0));
    }

    #[test]
    fn test_bind_measures_on_resize_events() {
        let env = EventRegistry::new();
        let width = Rc::new(Cell::new(640.0));
        let source_width = width.clone();

        let viewport = ViewportSource::new(Size::default());
        viewport.bind(env.clone(), move || Size::new(source_width.get(), 480.0));
        assert_eq!(viewport.size(), Size::new(640.0, 480.0));
        assert_eq!(env.count(EventKind::Resize), 1);

        width.set(1280.0);
        dispatch(&env, None, event(EventKind::Resize, 0.0, 0.0));
        assert_eq!(viewport.size(), Size::new(1280.0, 480.0));
    }

    #[test]
    fn test_rebind_and_drop_release_listener() {
        let env = EventRegistry::new();
        let viewport = ViewportSource::new(Size::default());
        viewport.bind(env.clone(), || Size::new(1.0, 1.0));
        viewport.bind(env.clone(), || Size::new(2.0, 2.0));
        assert_eq!(env.listener_count(), 1);

        viewport.unbind();
        viewport.unbind();
        assert_eq!(env.listener_count(), 0);

        viewport.bind(env.clone(), || Size::new(3.0, 3.0));
        drop(viewport);
        assert_eq!(env.listener_count(), 0);
    }
}
