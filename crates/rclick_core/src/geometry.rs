//! Menu placement.
//!
//! [`resolve_position`] is the pure clamping rule. [`MenuGeometry`] owns the
//! measured menu size and the two-phase open protocol: the size of the menu is
//! unknown until the host has rendered it, so opening first calls
//! [`MenuGeometry::request_open`] and measurement happens later in
//! [`MenuGeometry::on_rendered`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::host::MenuRoot;
use crate::observable::{Observable, Subscription};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Compute where the top-left corner of the menu goes.
///
/// The menu is anchored at the cursor. If it would overflow on the right it
/// flips so its right edge sits at the cursor; if it would overflow at the
/// bottom it is pinned to the bottom edge. The result never leaves the
/// viewport and never goes negative.
pub fn resolve_position(cursor: Point, menu: Size, viewport: Size) -> Point {
    resolve_position_with_margin(cursor, menu, viewport, 0.0)
}

/// Like [`resolve_position`], keeping `margin` pixels free on every side.
pub fn resolve_position_with_margin(cursor: Point, menu: Size, viewport: Size, margin: f32) -> Point {
    let (cx, cy) = (finite_or_zero(cursor.x), finite_or_zero(cursor.y));
    let (w, h) = (finite_or_zero(menu.width).max(0.0), finite_or_zero(menu.height).max(0.0));
    let (vw, vh) = (finite_or_zero(viewport.width), finite_or_zero(viewport.height));
    let margin = finite_or_zero(margin).max(0.0);

    let right = vw - margin;
    let bottom = vh - margin;

    // Horizontal axis flips; the vertical axis only pins.
    let mut x = cx;
    if cx + w > right {
        x = cx - w;
    }
    let mut y = cy;
    if cy + h > bottom {
        y = bottom - h;
    }

    Point { x: x.min(right - w).max(margin), y: y.min(bottom - h).max(margin) }
}

// ============================================================================
// MenuGeometry
// ============================================================================

/// Where the open/measure lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurePhase {
    /// Menu is not shown.
    Closed,
    /// Visibility flipped on; waiting for the host to render.
    AwaitingRender,
    /// Menu has been measured and its size is being observed.
    Measured,
}

/// Measured menu size and the observer keeping it current.
pub struct MenuGeometry {
    measured: Observable<Option<Size>>,
    phase: Cell<MeasurePhase>,
    open: Rc<Cell<bool>>,
    size_observer: RefCell<Option<Subscription>>,
}

impl Default for MenuGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuGeometry {
    pub fn new() -> Self {
        Self {
            measured: Observable::new(None),
            phase: Cell::new(MeasurePhase::Closed),
            open: Rc::new(Cell::new(false)),
            size_observer: RefCell::new(None),
        }
    }

    /// First phase of opening: forget the previous size and wait for a render.
    pub fn request_open(&self) {
        self.teardown_observer();
        self.measured.set(None);
        self.open.set(true);
        self.phase.set(MeasurePhase::AwaitingRender);
        tracing::trace!("Menu geometry awaiting render");
    }

    /// Second phase of opening: measure the rendered menu and observe it.
    ///
    /// A missing root is a benign no-op; the next render may supply one.
    /// Calls outside the awaiting phase are ignored, so measurement happens at
    /// most once per opening.
    pub fn on_rendered(&self, root: Option<&dyn MenuRoot>) {
        if self.phase.get() != MeasurePhase::AwaitingRender {
            return;
        }
        let Some(root) = root else {
            tracing::debug!("Menu root not rendered yet; skipping measurement");
            return;
        };

        let size = root.measure();
        tracing::debug!(width = size.width, height = size.height, "Measured menu");
        self.measured.set(Some(size));

        let measured = self.measured.clone();
        let open = self.open.clone();
        let observer = root.observe_size(Box::new(move |size| {
            if open.get() {
                measured.set(Some(size));
            }
        }));
        *self.size_observer.borrow_mut() = Some(observer);
        self.phase.set(MeasurePhase::Measured);
    }

    /// Tear down measurement when the menu closes.
    pub fn close(&self) {
        self.open.set(false);
        self.teardown_observer();
        self.phase.set(MeasurePhase::Closed);
        self.measured.set(None);
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> MeasurePhase {
        self.phase.get()
    }

    /// The last measured size, if the menu has been measured this opening.
    pub fn measured(&self) -> Option<Size> {
        self.measured.get()
    }

    /// Observable form of the measured size.
    pub fn measured_observable(&self) -> &Observable<Option<Size>> {
        &self.measured
    }

    /// Whether a size observer is currently attached.
    pub fn is_observing(&self) -> bool {
        self.size_observer.borrow().is_some()
    }

    /// Resolve the menu position for the current measurement.
    ///
    /// Before measurement the menu is treated as zero-sized, so it sits at the
    /// cursor (clamped to the viewport).
    pub fn placement(&self, cursor: Point, viewport: Size, margin: f32) -> Point {
        let menu = self.measured().unwrap_or_default();
        resolve_position_with_margin(cursor, menu, viewport, margin)
    }

    fn teardown_observer(&self) {
        // Take first so the drop runs without the RefCell borrowed.
        let observer = self.size_observer.borrow_mut().take();
        drop(observer);
    }
}

impl Drop for MenuGeometry {
    fn drop(&mut self) {
        self.open.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMenuRoot;

    fn resolve(c: (f32, f32), m: (f32, f32), v: (f32, f32)) -> (f32, f32) {
        let p = resolve_position(Point::new(c.0, c.1), Size::new(m.0, m.1), Size::new(v.0, v.1));
        (p.x, p.y)
    }

    #[test]
    fn test_anchor_at_cursor_without_overflow() {
        assert_eq!(resolve((800.0, 600.0), (150.0, 80.0), (1000.0, 700.0)), (800.0, 600.0));
    }

    #[test]
    fn test_horizontal_flip() {
        assert_eq!(resolve((950.0, 600.0), (150.0, 80.0), (1000.0, 700.0)), (800.0, 600.0));
    }

    #[test]
    fn test_vertical_pin_does_not_flip() {
        // Pinned to the bottom edge, not flipped above the cursor.
        assert_eq!(resolve((10.0, 680.0), (150.0, 80.0), (1000.0, 700.0)), (10.0, 620.0));
    }

    #[test]
    fn test_menu_larger_than_viewport_clamps_to_origin() {
        assert_eq!(resolve((50.0, 40.0), (300.0, 500.0), (200.0, 100.0)), (0.0, 0.0));
    }

    #[test]
    fn test_flip_near_left_edge_clamps() {
        // Flip would push it to x = -60.
        assert_eq!(resolve((90.0, 0.0), (150.0, 80.0), (200.0, 700.0)), (0.0, 0.0));
    }

    #[test]
    fn test_result_stays_inside_viewport() {
        let viewport = Size::new(640.0, 480.0);
        let menu = Size::new(120.0, 200.0);
        let mut cx = -50.0;
        while cx <= 700.0 {
            let mut cy = -50.0;
            while cy <= 540.0 {
                let p = resolve_position(Point::new(cx, cy), menu, viewport);
                assert!(p.x >= 0.0 && p.x <= viewport.width - menu.width, "x={} for {cx}", p.x);
                assert!(p.y >= 0.0 && p.y <= viewport.height - menu.height, "y={} for {cy}", p.y);
                cy += 37.0;
            }
            cx += 41.0;
        }
    }

    #[test]
    fn test_non_finite_inputs() {
        let p = resolve_position(
            Point::new(f32::NAN, 10.0),
            Size::new(50.0, f32::INFINITY),
            Size::new(100.0, 100.0),
        );
        assert_eq!(p, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_margin_keeps_gap() {
        let p = resolve_position_with_margin(
            Point::new(990.0, 695.0),
            Size::new(100.0, 50.0),
            Size::new(1000.0, 700.0),
            8.0,
        );
        assert_eq!(p, Point::new(890.0, 642.0));
    }

    #[test]
    fn test_two_phase_open() {
        let geometry = MenuGeometry::new();
        let root = FakeMenuRoot::new(Size::new(150.0, 80.0));

        geometry.request_open();
        assert_eq!(geometry.phase(), MeasurePhase::AwaitingRender);
        assert_eq!(geometry.measured(), None);

        geometry.on_rendered(None);
        assert_eq!(geometry.phase(), MeasurePhase::AwaitingRender);

        geometry.on_rendered(Some(&root));
        assert_eq!(geometry.phase(), MeasurePhase::Measured);
        assert_eq!(geometry.measured(), Some(Size::new(150.0, 80.0)));
        assert!(geometry.is_observing());
        assert_eq!(root.observer_count(), 1);
    }

    #[test]
    fn test_remeasures_on_content_resize() {
        let geometry = MenuGeometry::new();
        let root = FakeMenuRoot::new(Size::new(150.0, 80.0));
        geometry.request_open();
        geometry.on_rendered(Some(&root));

        root.resize(Size::new(150.0, 120.0));
        assert_eq!(geometry.measured(), Some(Size::new(150.0, 120.0)));
    }

    #[test]
    fn test_close_detaches_observer() {
        let geometry = MenuGeometry::new();
        let root = FakeMenuRoot::new(Size::new(150.0, 80.0));
        geometry.request_open();
        geometry.on_rendered(Some(&root));

        geometry.close();
        assert!(!geometry.is_observing());
        assert_eq!(root.observer_count(), 0);
        assert_eq!(geometry.measured(), None);

        root.resize(Size::new(10.0, 10.0));
        assert_eq!(geometry.measured(), None);
    }

    #[test]
    fn test_render_without_open_is_ignored() {
        let geometry = MenuGeometry::new();
        let root = FakeMenuRoot::new(Size::new(150.0, 80.0));
        geometry.on_rendered(Some(&root));
        assert_eq!(geometry.measured(), None);
        assert_eq!(root.observer_count(), 0);
    }

    #[test]
    fn test_placement_before_measurement_uses_cursor() {
        let geometry = MenuGeometry::new();
        geometry.request_open();
        let p = geometry.placement(Point::new(30.0, 40.0), Size::new(100.0, 100.0), 0.0);
        assert_eq!(p, Point::new(30.0, 40.0));
    }
}
