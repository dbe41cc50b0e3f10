//! Encoding presets created for every transcoding pipeline

use crate::naming;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output formats produced by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    Mp4,
    Webm,
    Flv,
    Mp3,
    Ogg,
}

impl PresetKind {
    pub const ALL: [PresetKind; 5] = [
        PresetKind::Mp4,
        PresetKind::Webm,
        PresetKind::Flv,
        PresetKind::Mp3,
        PresetKind::Ogg,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PresetKind::Mp4 => "MP4",
            PresetKind::Webm => "WebM",
            PresetKind::Flv => "FLV",
            PresetKind::Mp3 => "MP3",
            PresetKind::Ogg => "OGG",
        }
    }

    pub fn container(&self) -> &'static str {
        match self {
            PresetKind::Mp4 => "mp4",
            PresetKind::Webm => "webm",
            PresetKind::Flv => "flv",
            PresetKind::Mp3 => "mp3",
            PresetKind::Ogg => "ogg",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, PresetKind::Mp4 | PresetKind::Webm | PresetKind::Flv)
    }
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.container())
    }
}

/// Preset definition in the shape the transcoding API accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresetSpec {
    pub name: String,
    pub description: String,
    pub container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoSpec>,
    pub audio: AudioSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<ThumbnailSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoSpec {
    pub codec: String,
    pub codec_options: BTreeMap<String, String>,
    #[serde(rename = "FixedGOP")]
    pub fixed_gop: String,
    pub keyframes_max_dist: String,
    pub bit_rate: String,
    pub frame_rate: String,
    pub max_width: String,
    pub max_height: String,
    pub display_aspect_ratio: String,
    pub sizing_policy: String,
    pub padding_policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioSpec {
    pub codec: String,
    pub sample_rate: String,
    pub bit_rate: String,
    pub channels: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub codec_options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ThumbnailSpec {
    pub format: String,
    pub interval: String,
    pub max_width: String,
    pub max_height: String,
    pub sizing_policy: String,
    pub padding_policy: String,
}

fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn h264_video() -> VideoSpec {
    VideoSpec {
        codec: "H.264".to_string(),
        codec_options: options(&[
            ("InterlacedMode", "Progressive"),
            ("MaxReferenceFrames", "3"),
            ("Level", "3.1"),
            ("ColorSpaceConversionMode", "None"),
            ("Profile", "main"),
        ]),
        ..hd_video("vp8")
    }
}

/// 720p, 30 fps, 2200 kbps, keyframe every 90 frames
fn hd_video(codec: &str) -> VideoSpec {
    VideoSpec {
        codec: codec.to_string(),
        codec_options: options(&[("Profile", "1")]),
        fixed_gop: "true".to_string(),
        keyframes_max_dist: "90".to_string(),
        bit_rate: "2200".to_string(),
        frame_rate: "30".to_string(),
        max_width: "1280".to_string(),
        max_height: "720".to_string(),
        display_aspect_ratio: "auto".to_string(),
        sizing_policy: "ShrinkToFit".to_string(),
        padding_policy: "NoPad".to_string(),
    }
}

fn audio(codec: &str, sample_rate: &str, bit_rate: &str, profile: Option<&str>) -> AudioSpec {
    AudioSpec {
        codec: codec.to_string(),
        sample_rate: sample_rate.to_string(),
        bit_rate: bit_rate.to_string(),
        channels: "2".to_string(),
        codec_options: profile
            .map(|p| options(&[("Profile", p)]))
            .unwrap_or_default(),
    }
}

/// PNG frame every 60 seconds, shrunk to fit 192x108
fn thumbnails() -> ThumbnailSpec {
    ThumbnailSpec {
        format: "png".to_string(),
        interval: "60".to_string(),
        max_width: "192".to_string(),
        max_height: "108".to_string(),
        sizing_policy: "ShrinkToFit".to_string(),
        padding_policy: "NoPad".to_string(),
    }
}

/// Preset definition for `kind` in environment `env`
pub fn preset_spec(env: &str, kind: PresetKind) -> PresetSpec {
    let (video, audio) = match kind {
        PresetKind::Mp4 => (Some(h264_video()), audio("AAC", "48000", "160", Some("AAC-LC"))),
        PresetKind::Webm => (Some(hd_video("vp8")), audio("vorbis", "48000", "160", None)),
        PresetKind::Flv => (Some(h264_video()), audio("AAC", "44100", "160", Some("AAC-LC"))),
        PresetKind::Mp3 => (None, audio("mp3", "44100", "128", None)),
        PresetKind::Ogg => (None, audio("vorbis", "44100", "128", None)),
    };

    PresetSpec {
        name: naming::preset_name(env, kind.label()),
        description: String::new(),
        container: kind.container().to_string(),
        thumbnails: video.as_ref().map(|_| thumbnails()),
        video,
        audio,
    }
}

/// All presets for `env`, in creation order
pub fn catalog(env: &str) -> Vec<(PresetKind, PresetSpec)> {
    PresetKind::ALL
        .iter()
        .map(|kind| (*kind, preset_spec(env, *kind)))
        .collect()
}
