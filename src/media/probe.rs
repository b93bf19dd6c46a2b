use crate::error::ProbeError;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub fn pack_resolution(resolution: Resolution) -> String {
    resolution.to_string()
}

/// Reads the metadata the timing harness needs from a target video.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn frame_total(&self, path: &Path) -> Result<u64, ProbeError>;
    async fn resolution(&self, path: &Path) -> Result<Resolution, ProbeError>;
    async fn fps(&self, path: &Path) -> Result<f64, ProbeError>;

    /// All three properties at once. Probes that can read them in a single
    /// pass should override this.
    async fn stream_info(&self, path: &Path) -> Result<VideoStreamInfo, ProbeError> {
        Ok(VideoStreamInfo {
            frame_total: self.frame_total(path).await?,
            resolution: self.resolution(path).await?,
            fps: self.fps(path).await?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamInfo {
    pub frame_total: u64,
    pub resolution: Resolution,
    pub fps: f64,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

/// `MediaProbe` backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    async fn run(&self, path: &Path) -> Result<VideoStreamInfo, ProbeError> {
        debug!("Probing {}", path.display());
        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,avg_frame_rate,r_frame_rate,nb_frames,duration",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| ProbeError::SpawnError(e, path.to_path_buf()))?;

        if !output.status.success() {
            return Err(ProbeError::ExitError {
                path: path.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_probe_output(&output.stdout, path)
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn frame_total(&self, path: &Path) -> Result<u64, ProbeError> {
        Ok(self.run(path).await?.frame_total)
    }

    async fn resolution(&self, path: &Path) -> Result<Resolution, ProbeError> {
        Ok(self.run(path).await?.resolution)
    }

    async fn fps(&self, path: &Path) -> Result<f64, ProbeError> {
        Ok(self.run(path).await?.fps)
    }

    async fn stream_info(&self, path: &Path) -> Result<VideoStreamInfo, ProbeError> {
        self.run(path).await
    }
}

pub(crate) fn parse_probe_output(stdout: &[u8], path: &Path) -> Result<VideoStreamInfo, ProbeError> {
    let malformed = |reason: String| ProbeError::MalformedOutput(reason, path.to_path_buf());

    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| malformed(e.to_string()))?;
    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ProbeError::NoVideoStream(path.to_path_buf()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
        _ => return Err(malformed("missing stream dimensions".to_string())),
    };

    let fps = [stream.avg_frame_rate.as_deref(), stream.r_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(parse_frame_rate)
        .ok_or_else(|| malformed("missing frame rate".to_string()))?;

    let frame_total = match stream.nb_frames.as_deref().and_then(|n| n.parse::<u64>().ok()) {
        Some(frames) => frames,
        None => {
            let duration = stream
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d > 0.0)
                .ok_or_else(|| malformed("missing frame count and duration".to_string()))?;
            (duration * fps).round() as u64
        }
    };

    Ok(VideoStreamInfo {
        frame_total,
        resolution: Resolution::new(width, height),
        fps,
    })
}

/// Parses ffprobe rates such as `30000/1001` or `25`. `0/0` is treated as unknown.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<f64>().ok()?;
            let denominator = denominator.trim().parse::<f64>().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => rate.trim().parse::<f64>().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<VideoStreamInfo, ProbeError> {
        parse_probe_output(json.as_bytes(), Path::new("target-240p.mp4"))
    }

    #[test]
    fn packs_resolution_as_width_by_height() {
        assert_eq!(pack_resolution(Resolution::new(1920, 1080)), "1920x1080");
    }

    #[test]
    fn parses_full_stream_entry() {
        let info = parse(
            r#"{"programs":[],"streams":[{"width":426,"height":240,"r_frame_rate":"25/1","avg_frame_rate":"25/1","duration":"10.000000","nb_frames":"250"}]}"#,
        )
        .unwrap();

        assert_eq!(info.frame_total, 250);
        assert_eq!(info.resolution, Resolution::new(426, 240));
        assert_eq!(info.fps, 25.0);
    }

    #[test]
    fn falls_back_to_duration_and_real_frame_rate() {
        let info = parse(
            r#"{"streams":[{"width":1280,"height":720,"avg_frame_rate":"0/0","r_frame_rate":"30000/1001","duration":"2.002"}]}"#,
        )
        .unwrap();

        assert!((info.fps - 29.97).abs() < 0.01);
        assert_eq!(info.frame_total, 60);
    }

    #[test]
    fn reports_missing_video_stream() {
        assert!(matches!(
            parse(r#"{"streams":[]}"#),
            Err(ProbeError::NoVideoStream(_))
        ));
    }

    #[test]
    fn reports_malformed_output() {
        assert!(matches!(
            parse("not json"),
            Err(ProbeError::MalformedOutput(_, _))
        ));
        assert!(matches!(
            parse(r#"{"streams":[{"width":640,"height":360}]}"#),
            Err(ProbeError::MalformedOutput(_, _))
        ));
    }

    #[test]
    fn frame_rate_parsing() {
        assert_eq!(parse_frame_rate("24"), Some(24.0));
        assert_eq!(parse_frame_rate("50/2"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    struct SplitProbe;

    #[async_trait]
    impl MediaProbe for SplitProbe {
        async fn frame_total(&self, _path: &Path) -> Result<u64, ProbeError> {
            Ok(120)
        }

        async fn resolution(&self, _path: &Path) -> Result<Resolution, ProbeError> {
            Ok(Resolution::new(640, 360))
        }

        async fn fps(&self, _path: &Path) -> Result<f64, ProbeError> {
            Ok(30.0)
        }
    }

    #[tokio::test]
    async fn stream_info_defaults_to_individual_queries() {
        let info = SplitProbe
            .stream_info(Path::new("target-360p.mp4"))
            .await
            .unwrap();
        assert_eq!(
            info,
            VideoStreamInfo {
                frame_total: 120,
                resolution: Resolution::new(640, 360),
                fps: 30.0,
            }
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let probe = FfprobeProbe::new().with_program("/nonexistent/ffprobe");
        let result = probe.stream_info(Path::new("target-240p.mp4")).await;
        assert!(matches!(result, Err(ProbeError::SpawnError(_, _))));
    }
}
