use crate::error::StateError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub mod keys {
    pub const SOURCE_PATHS: &str = "source_paths";
    pub const TARGET_PATH: &str = "target_path";
    pub const OUTPUT_PATH: &str = "output_path";
    pub const OUTPUT_VIDEO_RESOLUTION: &str = "output_video_resolution";
    pub const OUTPUT_VIDEO_FPS: &str = "output_video_fps";
    pub const OUTPUT_VIDEO_PRESET: &str = "output_video_preset";
    pub const TEMP_FRAME_FORMAT: &str = "temp_frame_format";
    pub const FACE_LANDMARKER_SCORE: &str = "face_landmarker_score";
    pub const SYSTEM_MEMORY_LIMIT: &str = "system_memory_limit";
    pub const PROCESSORS: &str = "processors";
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Text(String),
    Path(PathBuf),
    Paths(Vec<PathBuf>),
    List(Vec<String>),
    Integer(i64),
    Float(f64),
}

impl StateValue {
    pub fn kind(&self) -> &'static str {
        match self {
            StateValue::Text(_) => "text",
            StateValue::Path(_) => "path",
            StateValue::Paths(_) => "path list",
            StateValue::List(_) => "list",
            StateValue::Integer(_) => "integer",
            StateValue::Float(_) => "float",
        }
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<PathBuf> for StateValue {
    fn from(value: PathBuf) -> Self {
        StateValue::Path(value)
    }
}

impl From<&Path> for StateValue {
    fn from(value: &Path) -> Self {
        StateValue::Path(value.to_path_buf())
    }
}

impl From<Vec<PathBuf>> for StateValue {
    fn from(value: Vec<PathBuf>) -> Self {
        StateValue::Paths(value)
    }
}

impl From<Vec<String>> for StateValue {
    fn from(value: Vec<String>) -> Self {
        StateValue::List(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Integer(value)
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Float(value)
    }
}

/// Key/value state shared by every benchmark stage.
///
/// Writes overwrite in place and entries are never removed, so a key that has
/// been seeded stays readable for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    items: IndexMap<String, StateValue>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn get_path(&self, key: &str) -> Result<Option<&Path>, StateError> {
        match self.get(key) {
            None => Ok(None),
            Some(StateValue::Path(path)) => Ok(Some(path.as_path())),
            Some(other) => Err(mismatch(key, "path", other)),
        }
    }

    pub fn require_path(&self, key: &str) -> Result<&Path, StateError> {
        self.get_path(key)?
            .ok_or_else(|| StateError::Missing(key.to_string()))
    }

    pub fn get_paths(&self, key: &str) -> Result<Option<&[PathBuf]>, StateError> {
        match self.get(key) {
            None => Ok(None),
            Some(StateValue::Paths(paths)) => Ok(Some(paths.as_slice())),
            Some(other) => Err(mismatch(key, "path list", other)),
        }
    }

    pub fn get_text(&self, key: &str) -> Result<Option<&str>, StateError> {
        match self.get(key) {
            None => Ok(None),
            Some(StateValue::Text(text)) => Ok(Some(text.as_str())),
            Some(other) => Err(mismatch(key, "text", other)),
        }
    }

    pub fn require_list(&self, key: &str) -> Result<&[String], StateError> {
        match self.get(key) {
            None => Err(StateError::Missing(key.to_string())),
            Some(StateValue::List(list)) => Ok(list.as_slice()),
            Some(other) => Err(mismatch(key, "list", other)),
        }
    }

    pub fn get_integer(&self, key: &str) -> Result<Option<i64>, StateError> {
        match self.get(key) {
            None => Ok(None),
            Some(StateValue::Integer(value)) => Ok(Some(*value)),
            Some(other) => Err(mismatch(key, "integer", other)),
        }
    }

    pub fn get_float(&self, key: &str) -> Result<Option<f64>, StateError> {
        match self.get(key) {
            None => Ok(None),
            Some(StateValue::Float(value)) => Ok(Some(*value)),
            Some(StateValue::Integer(value)) => Ok(Some(*value as f64)),
            Some(other) => Err(mismatch(key, "float", other)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn mismatch(key: &str, expected: &'static str, found: &StateValue) -> StateError {
    StateError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
