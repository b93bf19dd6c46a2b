use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub const BENCHMARK_LABELS: [&str; 7] = ["240p", "360p", "540p", "720p", "1080p", "1440p", "2160p"];

/// Sample videos available for benchmarking, keyed by resolution label.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<String, PathBuf>,
}

impl Catalog {
    /// The seven standard targets, `target-<label>.mp4` under `assets_dir`.
    pub fn new(assets_dir: &Path) -> Self {
        BENCHMARK_LABELS
            .iter()
            .fold(Self::default(), |catalog, label| {
                catalog.with_entry(*label, assets_dir.join(format!("target-{}.mp4", label)))
            })
    }

    pub fn with_entry(mut self, label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(label.into(), path.into());
        self
    }

    pub fn get(&self, label: &str) -> Option<&Path> {
        self.entries.get(label).map(PathBuf::as_path)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maps the selected labels to target paths in selection order, dropping
    /// labels the catalog does not know.
    pub fn resolve<S: AsRef<str>>(&self, labels: &[S]) -> Vec<PathBuf> {
        labels
            .iter()
            .filter_map(|label| self.get(label.as_ref()))
            .map(Path::to_path_buf)
            .collect()
    }
}
