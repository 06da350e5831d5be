//! Video edit types for the media transcoding utility.
//!
//! The transcoder is an external collaborator invoked by the media API
//! surface, not by the workflow engine. These types describe the edit a
//! caller requests and the probe data used to clamp it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Basic stream facts from probing an input file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
}

/// A crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Target output dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

/// A time window to keep, in seconds from the start of the input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Trim {
    pub start_secs: f64,
    pub end_secs: f64,
}

/// The full edit to apply to a video. All parts are optional; an empty
/// spec is a plain re-encode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EditSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<Resize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<Trim>,
}

impl EditSpec {
    /// Clamp crop dimensions and trim end to what the source actually has.
    pub fn clamped_to(mut self, info: MediaInfo) -> Self {
        if let Some(crop) = &mut self.crop {
            crop.width = crop.width.min(info.width);
            crop.height = crop.height.min(info.height);
        }
        if let Some(trim) = &mut self.trim {
            trim.end_secs = trim.end_secs.min(info.duration_secs);
        }
        self
    }
}

/// Errors from the media transcoding utility.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to download source video: {0}")]
    Download(String),

    #[error("probe failed: {0}")]
    Probe(String),

    #[error("transcode failed: {0}")]
    Transcode(String),

    #[error("io error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping_limits_crop_and_trim() {
        let spec = EditSpec {
            crop: Some(CropRect {
                x: 0,
                y: 0,
                width: 4000,
                height: 4000,
            }),
            resize: Some(Resize {
                width: 1280,
                height: 720,
            }),
            trim: Some(Trim {
                start_secs: 1.0,
                end_secs: 600.0,
            }),
        };
        let info = MediaInfo {
            width: 1920,
            height: 1080,
            duration_secs: 90.5,
        };
        let clamped = spec.clamped_to(info);
        let crop = clamped.crop.unwrap();
        assert_eq!(crop.width, 1920);
        assert_eq!(crop.height, 1080);
        assert_eq!(clamped.trim.unwrap().end_secs, 90.5);
        // resize passes through untouched
        assert_eq!(clamped.resize.unwrap().width, 1280);
    }

    #[test]
    fn empty_spec_serializes_to_empty_object() {
        let json = serde_json::to_string(&EditSpec::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
