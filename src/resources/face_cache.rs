use indexmap::IndexMap;
use std::sync::{Mutex, PoisonError};

/// Faces detected per reference frame, kept between pipeline invocations so
/// repeated cycles over the same target skip detection.
#[derive(Debug, Default)]
pub struct FaceCache {
    faces: Mutex<IndexMap<String, usize>>,
}

impl FaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, frame_key: impl Into<String>, face_count: usize) {
        self.faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(frame_key.into(), face_count);
    }

    pub fn get(&self, frame_key: &str) -> Option<usize> {
        self.faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(frame_key)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.faces.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.faces.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
