use serde::{Deserialize, Serialize};
use tracing::warn;

/// A `(index, 0xRRGGBB)` control point of a palette.
pub type Stop = (u8, u32);

/// Named waterfall palettes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Grayscale,
    #[default]
    Amber,
    Copper,
    Blue,
    Ice,
    Purple,
    Fire,
    Viridis,
    Magma,
    Inferno,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 10] = [
        Self::Grayscale,
        Self::Amber,
        Self::Copper,
        Self::Blue,
        Self::Ice,
        Self::Purple,
        Self::Fire,
        Self::Viridis,
        Self::Magma,
        Self::Inferno,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Amber => "amber",
            Self::Copper => "copper",
            Self::Blue => "blue",
            Self::Ice => "ice",
            Self::Purple => "purple",
            Self::Fire => "fire",
            Self::Viridis => "viridis",
            Self::Magma => "magma",
            Self::Inferno => "inferno",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Like [`from_name`](Self::from_name), falling back to grayscale.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(colormap = name, "Unknown colormap, using grayscale");
            Self::Grayscale
        })
    }

    /// Palette control points, sorted by index.
    pub fn stops(self) -> &'static [Stop] {
        match self {
            Self::Grayscale => &[(0, 0x000000), (255, 0xffffff)],
            Self::Amber => &[
                (0, 0x000000),
                (40, 0x2b1b00),
                (96, 0x7a3e00),
                (180, 0xf6a400),
                (255, 0xfff5cc),
            ],
            Self::Copper => &[
                (0, 0x000000),
                (48, 0x1a0e06),
                (110, 0x5a2e15),
                (190, 0xb36b2c),
                (255, 0xffd29c),
            ],
            Self::Blue => &[
                (0, 0x000000),
                (64, 0x001a33),
                (140, 0x004c99),
                (210, 0x33aaff),
                (255, 0xd6f0ff),
            ],
            Self::Ice => &[
                (0, 0x000000),
                (64, 0x001a33),
                (170, 0x66b2ff),
                (255, 0xffffff),
            ],
            Self::Purple => &[
                (0, 0x000000),
                (64, 0x1a0033),
                (150, 0x5a00a3),
                (210, 0xc084ff),
                (255, 0xffe6ff),
            ],
            Self::Fire => &[
                (0, 0x000000),
                (50, 0x330000),
                (120, 0x990000),
                (200, 0xff6600),
                (255, 0xffff66),
            ],
            Self::Viridis => &[
                (0, 0x440154),
                (80, 0x3b528b),
                (140, 0x21918c),
                (200, 0x5ec962),
                (255, 0xfde725),
            ],
            Self::Magma => &[
                (0, 0x000004),
                (90, 0x3b0f70),
                (150, 0x8c2981),
                (200, 0xde4968),
                (235, 0xfca636),
                (255, 0xfcfdbf),
            ],
            Self::Inferno => &[
                (0, 0x000004),
                (70, 0x1f0c48),
                (135, 0x5c1e76),
                (190, 0xb63679),
                (225, 0xee7b51),
                (255, 0xf6d746),
            ],
        }
    }
}

impl std::fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn unpack_rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}
