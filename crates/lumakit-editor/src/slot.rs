//! Single-owner current-image slot.
//!
//! Readers and writers exchange whole `Arc<RasterBuffer>`s under a
//! short-lived mutex, so an observer always sees either the previous or
//! the next complete buffer, never a partial write.

use std::sync::{Arc, Mutex};

use lumakit_core::RasterBuffer;

#[derive(Debug, Default, Clone)]
pub struct ImageSlot {
    inner: Arc<Mutex<Option<Arc<RasterBuffer>>>>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the current image. The previous buffer is
    /// released once the last outstanding reader drops its `Arc`.
    pub fn publish(&self, image: Arc<RasterBuffer>) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(image);
    }

    /// Snapshot the current image, if any.
    pub fn get(&self) -> Option<Arc<RasterBuffer>> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    pub fn clear(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    pub fn is_loaded(&self) -> bool {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let slot = ImageSlot::new();
        assert!(slot.get().is_none());
        assert!(!slot.is_loaded());
    }

    #[test]
    fn test_publish_replaces_whole_buffer() {
        let slot = ImageSlot::new();
        let a = Arc::new(RasterBuffer::filled(2, 2, [1, 1, 1, 255]));
        let b = Arc::new(RasterBuffer::filled(4, 4, [2, 2, 2, 255]));

        slot.publish(a.clone());
        let seen = slot.get().unwrap();
        assert_eq!(seen.width, 2);

        slot.publish(b);
        // The earlier snapshot is unaffected by the replacement.
        assert_eq!(seen.width, 2);
        assert_eq!(slot.get().unwrap().width, 4);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let slot = ImageSlot::new();
        let other = slot.clone();
        slot.publish(Arc::new(RasterBuffer::filled(3, 3, [0, 0, 0, 255])));
        assert!(other.is_loaded());
        other.clear();
        assert!(!slot.is_loaded());
    }
}
