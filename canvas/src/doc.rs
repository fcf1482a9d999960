//! Document model: the ordered sequence of committed shapes for one session.
//!
//! The store is a local replica. Shapes arrive from three places: the seed
//! fetched on load, local commits, and relayed `chat` frames from peers. All
//! three append to the same sequence, and the renderer replays it in order.
//! There is no identity, editing, or reconciliation.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use frames::Shape;

/// In-memory store of committed shapes, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a seed snapshot.
    pub fn load(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    /// Add a shape after every existing one.
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// All shapes in draw order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
