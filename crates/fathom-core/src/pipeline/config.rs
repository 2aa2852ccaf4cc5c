use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::align::{BlockAlignParams, JoinOptions};
use crate::color::ColorScheme;
use crate::compose::{AlignedOptions, ChannelView, PreviewOptions};
use crate::consts::{
    DEFAULT_BLOCK_GAP_PX, DEFAULT_BLOCK_SIZE, DEFAULT_MAX_ALIGN_SHIFT, DEFAULT_MAX_BLOCK_SHIFT,
    DEFAULT_ROW_WIDTH, DEFAULT_SMOOTH_SHIFT,
};

/// Complete run description, usually loaded from TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Metadata table (CSV).
    pub metadata: PathBuf,
    /// Binary survey holding the ping payloads.
    pub survey: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub blocks: BlockConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            metadata: PathBuf::from("survey.csv"),
            survey: PathBuf::from("survey.bin"),
            output: PathBuf::from("output"),
            blocks: BlockConfig::default(),
            video: VideoConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Batch block export settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub block_size: usize,
    /// Rendered width of each channel.
    pub width: usize,
    /// Black columns between the two channels.
    pub gap: usize,
    pub intensity_scale: f32,
    pub auto_align: bool,
    /// Added to the measured shift, or used alone when `auto_align` is off.
    pub manual_shift: i64,
    pub max_shift: usize,
    pub flip_left: bool,
    pub flip_right: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            width: DEFAULT_ROW_WIDTH,
            gap: DEFAULT_BLOCK_GAP_PX,
            intensity_scale: 1.0,
            auto_align: true,
            manual_shift: 0,
            max_shift: DEFAULT_MAX_BLOCK_SHIFT,
            flip_left: false,
            flip_right: false,
        }
    }
}

impl BlockConfig {
    pub fn align_params(&self) -> BlockAlignParams {
        BlockAlignParams {
            width: self.width,
            max_shift: self.max_shift,
            intensity_scale: self.intensity_scale,
        }
    }

    pub fn aligned_options(&self) -> AlignedOptions {
        AlignedOptions {
            width: self.width,
            gap: self.gap,
            flip_left: self.flip_left,
            flip_right: self.flip_right,
            intensity_scale: self.intensity_scale,
        }
    }

    /// Preview options at this config's width. The preview splits `width`
    /// between the two channels.
    pub fn preview_options(&self, view: ChannelView, water_column_px: usize) -> PreviewOptions {
        PreviewOptions {
            view,
            width: self.width,
            flip_left: self.flip_left,
            flip_right: self.flip_right,
            water_column_px,
            intensity_scale: self.intensity_scale,
        }
    }
}

/// Streaming export settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Height of each strip pushed into the frame builder.
    pub row_height: usize,
    pub video_height: usize,
    pub max_frames: Option<usize>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            video_height: 480,
            max_frames: None,
        }
    }
}

/// How the two halves of a strip are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Halves side by side.
    #[default]
    Compose,
    /// Left half in red, right half in green and blue.
    Overlay,
    /// Absolute difference of the halves.
    Difference,
}

impl std::fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compose => write!(f, "compose"),
            Self::Overlay => write!(f, "overlay"),
            Self::Difference => write!(f, "difference"),
        }
    }
}

impl std::str::FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compose" => Ok(Self::Compose),
            "overlay" => Ok(Self::Overlay),
            "difference" => Ok(Self::Difference),
            other => Err(format!("unknown preview mode: {other}")),
        }
    }
}

/// Streaming display options. Keys are upper-case in TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DisplayConfig {
    pub colormap: String,
    pub preview_mode: PreviewMode,
    pub show_seam: bool,
    /// Median window over recent lateral shifts; 1 or less disables smoothing.
    pub smooth_shift: usize,
    /// Zero columns added on both sides of the composite.
    pub edge_pad: usize,
    pub flip_right: bool,
    pub swap_lr: bool,
    pub max_align_shift: usize,
    pub auto_split: bool,
    pub force_split_mid: bool,
    pub align_channels: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colormap: ColorScheme::Amber.name().to_string(),
            preview_mode: PreviewMode::Compose,
            show_seam: false,
            smooth_shift: DEFAULT_SMOOTH_SHIFT,
            edge_pad: 0,
            flip_right: true,
            swap_lr: false,
            max_align_shift: DEFAULT_MAX_ALIGN_SHIFT,
            auto_split: true,
            force_split_mid: false,
            align_channels: true,
        }
    }
}

impl DisplayConfig {
    /// Resolved palette; unknown names fall back to grayscale.
    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme::resolve(&self.colormap)
    }

    pub fn join_options(&self) -> JoinOptions {
        JoinOptions {
            flip_right: self.flip_right,
            swap_lr: self.swap_lr,
            max_shift: self.max_align_shift,
        }
    }
}
