//! ffmpeg-backed media transcoder.
//!
//! Implements the `MediaTranscoder` port by shelling out to `ffprobe` for
//! stream facts and `ffmpeg` for the crop/scale/trim filter graph. Output
//! is always H.264/AAC MP4 with faststart, matching what the edit endpoint
//! serves back to callers.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use letterforge_core::media::MediaTranscoder;
use letterforge_types::media::{EditSpec, MediaError, MediaInfo};

/// Transcoder driving the system `ffmpeg`/`ffprobe` binaries.
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// Build the `-vf` filter chain for crop and scale.
    fn video_filters(spec: &EditSpec) -> Option<String> {
        let mut filters = Vec::new();
        if let Some(crop) = &spec.crop {
            filters.push(format!(
                "crop={}:{}:{}:{}",
                crop.width, crop.height, crop.x, crop.y
            ));
        }
        if let Some(resize) = &spec.resize {
            filters.push(format!("scale={}:{}", resize.width, resize.height));
        }
        if filters.is_empty() {
            None
        } else {
            Some(filters.join(","))
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTranscoder for FfmpegTranscoder {
    async fn probe(&self, input: &Path) -> Result<MediaInfo, MediaError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height:format=duration",
                "-of",
                "json",
            ])
            .arg(input)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MediaError::Probe(format!("failed to spawn ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::Probe(stderr.trim().to_string()));
        }

        let probe: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| MediaError::Probe(format!("invalid ffprobe output: {e}")))?;

        let stream = probe["streams"]
            .get(0)
            .ok_or_else(|| MediaError::Probe("no video stream found".to_string()))?;
        let width = stream["width"]
            .as_u64()
            .ok_or_else(|| MediaError::Probe("missing width".to_string()))? as u32;
        let height = stream["height"]
            .as_u64()
            .ok_or_else(|| MediaError::Probe("missing height".to_string()))? as u32;
        let duration_secs = probe["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| MediaError::Probe("missing duration".to_string()))?;

        Ok(MediaInfo {
            width,
            height,
            duration_secs,
        })
    }

    async fn process(
        &self,
        input: &Path,
        output: &Path,
        spec: &EditSpec,
    ) -> Result<(), MediaError> {
        let mut command = Command::new("ffmpeg");
        command.arg("-y");

        // Trim is applied on the input side so ffmpeg can seek instead of
        // decoding the discarded head of the file.
        if let Some(trim) = &spec.trim {
            command
                .args(["-ss", &trim.start_secs.to_string()])
                .args(["-t", &(trim.end_secs - trim.start_secs).to_string()]);
        }
        command.arg("-i").arg(input);

        if let Some(filters) = Self::video_filters(spec) {
            command.args(["-vf", &filters]);
        }

        command
            .args(["-c:v", "libx264", "-preset", "medium", "-crf", "23"])
            .args(["-c:a", "aac", "-b:a", "128k"])
            .args(["-movflags", "+faststart"])
            .arg(output)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "running ffmpeg"
        );

        let result = command
            .output()
            .await
            .map_err(|e| MediaError::Transcode(format!("failed to spawn ffmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(MediaError::Transcode(stderr.trim().to_string()));
        }

        Ok(())
    }
}
