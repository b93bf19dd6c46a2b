use std::path::{Path, PathBuf};
use uuid::Uuid;

const VIDEO_EXTENSIONS: &[&str] = &["avi", "m4v", "mkv", "mov", "mp4", "webm", "wmv"];

pub fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
        .unwrap_or(false)
}

/// Suggests a fresh output file in the system temp directory that keeps the
/// target's extension. Returns `None` for non-video targets.
pub fn suggest_output_path(target_path: &Path) -> Option<PathBuf> {
    suggest_output_path_in(&std::env::temp_dir(), target_path)
}

pub fn suggest_output_path_in(directory: &Path, target_path: &Path) -> Option<PathBuf> {
    if !is_video(target_path) {
        return None;
    }
    let extension = target_path.extension()?.to_str()?;
    let basename = Uuid::new_v4().simple().to_string();
    Some(directory.join(format!("{}.{}", &basename[..8], extension)))
}
