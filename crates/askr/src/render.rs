//! Per-layer render queue.
//!
//! During the render pass, drawing components push their own handle into the
//! layer bucket matching their entity's layer. The core only *collects*; a
//! renderer external to this crate drains the buckets between frames and
//! rasterizes however it likes. Layer 0 draws first (back), the highest
//! layer last (front).

use crate::handle::ComponentHandle;

/// Per-layer buckets of components that requested a draw this frame.
pub struct RenderQueue {
    layers: Vec<Vec<ComponentHandle>>,
}

impl RenderQueue {
    /// Create a queue with the given number of layers (at least 1).
    pub fn new(layer_count: usize) -> Self {
        assert!(layer_count > 0, "RenderQueue needs at least one layer");
        Self {
            layers: vec![Vec::new(); layer_count],
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Push a component into a layer bucket.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is out of range — submitting to a layer that no one
    /// will ever drain is a programmer error.
    pub fn submit(&mut self, layer: usize, component: ComponentHandle) {
        let count = self.layer_count();
        let bucket = self
            .layers
            .get_mut(layer)
            .unwrap_or_else(|| panic!("Render layer {} out of range (layer count {})", layer, count));
        bucket.push(component);
    }

    /// The components queued on one layer, in submission order.
    pub fn layer(&self, layer: usize) -> &[ComponentHandle] {
        &self.layers[layer]
    }

    /// Total queued components across all layers.
    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    /// Empty every bucket, keeping the layer structure.
    pub fn clear(&mut self) {
        for bucket in &mut self.layers {
            bucket.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{ComponentHandle, RawHandle};

    fn handle(i: u32) -> ComponentHandle {
        ComponentHandle(RawHandle {
            index: i,
            generation: 0,
        })
    }

    #[test]
    fn submit_in_order() {
        let mut queue = RenderQueue::new(2);
        queue.submit(0, handle(1));
        queue.submit(1, handle(2));
        queue.submit(0, handle(3));
        assert_eq!(queue.layer(0), &[handle(1), handle(3)]);
        assert_eq!(queue.layer(1), &[handle(2)]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn clear_keeps_layers() {
        let mut queue = RenderQueue::new(3);
        queue.submit(2, handle(1));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.layer_count(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn submit_out_of_range_panics() {
        let mut queue = RenderQueue::new(1);
        queue.submit(1, handle(0));
    }

    #[test]
    #[should_panic(expected = "at least one layer")]
    fn zero_layers_panics() {
        RenderQueue::new(0);
    }
}
