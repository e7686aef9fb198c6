//! In-memory host fakes shared by the unit tests.

use std::cell::Cell;

use crate::geometry::{Point, Size};
use crate::host::{EventKind, HostEvent, MenuRoot, NodeId, Region};
use crate::observable::{Emitter, Subscription};

pub fn event(kind: EventKind, x: f32, y: f32) -> HostEvent {
    HostEvent::new(kind, Point::new(x, y))
}

/// Rendered menu root with a settable size and a fixed set of node ids.
pub struct FakeMenuRoot {
    size: Cell<Size>,
    nodes: Vec<NodeId>,
    resized: Emitter<Size>,
}

impl FakeMenuRoot {
    pub fn new(size: Size) -> Self {
        Self::with_nodes(size, Vec::new())
    }

    pub fn with_nodes(size: Size, nodes: Vec<u64>) -> Self {
        Self {
            size: Cell::new(size),
            nodes: nodes.into_iter().map(NodeId::from_raw).collect(),
            resized: Emitter::new(),
        }
    }

    pub fn resize(&self, size: Size) {
        self.size.set(size);
        self.resized.emit(&size);
    }

    pub fn observer_count(&self) -> usize {
        self.resized.subscriber_count()
    }
}

impl Region for FakeMenuRoot {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

impl MenuRoot for FakeMenuRoot {
    fn measure(&self) -> Size {
        self.size.get()
    }

    fn observe_size(&self, on_change: Box<dyn Fn(Size)>) -> Subscription {
        self.resized.subscribe(move |size| on_change(*size))
    }
}
