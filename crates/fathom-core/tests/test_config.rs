use std::path::PathBuf;

use fathom_core::color::ColorScheme;
use fathom_core::compose::ChannelView;
use fathom_core::pipeline::config::{
    BlockConfig, DisplayConfig, PreviewMode, SurveyConfig, VideoConfig,
};

#[test]
fn test_default_config_round_trips_through_toml() {
    let config = SurveyConfig::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: SurveyConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_display_keys_are_upper_case() {
    let text = toml::to_string(&DisplayConfig::default()).unwrap();
    assert!(text.contains("PREVIEW_MODE"));
    assert!(text.contains("SMOOTH_SHIFT"));
    assert!(text.contains("FORCE_SPLIT_MID"));
    assert!(!text.contains("preview_mode"));
}

#[test]
fn test_partial_config_fills_defaults() {
    let text = r#"
metadata = "run/pings.csv"
survey = "run/pings.bin"
output = "out"

[blocks]
block_size = 20
auto_align = false
manual_shift = -3

[display]
PREVIEW_MODE = "difference"
COLORMAP = "viridis"
SHOW_SEAM = true
"#;
    let config: SurveyConfig = toml::from_str(text).unwrap();
    assert_eq!(config.metadata, PathBuf::from("run/pings.csv"));
    assert_eq!(config.blocks.block_size, 20);
    assert!(!config.blocks.auto_align);
    assert_eq!(config.blocks.manual_shift, -3);
    assert_eq!(config.blocks.width, BlockConfig::default().width);
    assert_eq!(config.video, VideoConfig::default());

    assert_eq!(config.display.preview_mode, PreviewMode::Difference);
    assert_eq!(config.display.color_scheme(), ColorScheme::Viridis);
    assert!(config.display.show_seam);
    assert!(config.display.flip_right);
    assert_eq!(config.display.smooth_shift, 11);
}

#[test]
fn test_video_limits() {
    let text = "row_height = 4\nvideo_height = 720\nmax_frames = 100\n";
    let video: VideoConfig = toml::from_str(text).unwrap();
    assert_eq!(video.row_height, 4);
    assert_eq!(video.video_height, 720);
    assert_eq!(video.max_frames, Some(100));
}

#[test]
fn test_preview_mode_parsing() {
    assert_eq!("Overlay".parse::<PreviewMode>(), Ok(PreviewMode::Overlay));
    assert_eq!(" compose ".parse::<PreviewMode>(), Ok(PreviewMode::Compose));
    assert!("sideways".parse::<PreviewMode>().is_err());
    assert_eq!(PreviewMode::Difference.to_string(), "difference");
}

#[test]
fn test_unknown_colormap_resolves_to_grayscale() {
    let display = DisplayConfig {
        colormap: "sepia".into(),
        ..Default::default()
    };
    assert_eq!(display.color_scheme(), ColorScheme::Grayscale);
    assert_eq!(DisplayConfig::default().color_scheme(), ColorScheme::Amber);
}

#[test]
fn test_derived_options_follow_config() {
    let blocks = BlockConfig {
        width: 300,
        gap: 2,
        flip_left: true,
        max_shift: 12,
        ..Default::default()
    };
    let params = blocks.align_params();
    assert_eq!((params.width, params.max_shift), (300, 12));

    let aligned = blocks.aligned_options();
    assert_eq!((aligned.width, aligned.gap), (300, 2));
    assert!(aligned.flip_left && !aligned.flip_right);

    let preview = blocks.preview_options(ChannelView::Right, 16);
    assert_eq!(preview.view, ChannelView::Right);
    assert_eq!(preview.water_column_px, 16);

    let display = DisplayConfig {
        swap_lr: true,
        max_align_shift: 9,
        ..Default::default()
    };
    let join = display.join_options();
    assert!(join.flip_right && join.swap_lr);
    assert_eq!(join.max_shift, 9);
}
