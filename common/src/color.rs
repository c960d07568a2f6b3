//! Colour buckets
//!
//! Shape alone cannot tell a palak gravy from a dal, so the local path
//! reduces an image to one of eight coarse buckets of its mean colour.
//! Pixel sampling lives in the binary crate; this module only holds the
//! thresholds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBucket {
    Red,
    Orange,
    Yellow,
    Green,
    White,
    Black,
    Brown,
    Unknown,
}

impl ColorBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBucket::Red => "red",
            ColorBucket::Orange => "orange",
            ColorBucket::Yellow => "yellow",
            ColorBucket::Green => "green",
            ColorBucket::White => "white",
            ColorBucket::Black => "black",
            ColorBucket::Brown => "brown",
            ColorBucket::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ColorBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColorBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(ColorBucket::Red),
            "orange" => Ok(ColorBucket::Orange),
            "yellow" => Ok(ColorBucket::Yellow),
            "green" => Ok(ColorBucket::Green),
            "white" => Ok(ColorBucket::White),
            "black" => Ok(ColorBucket::Black),
            "brown" => Ok(ColorBucket::Brown),
            "unknown" => Ok(ColorBucket::Unknown),
            _ => Err(format!("Unknown colour bucket: {}", s)),
        }
    }
}

/// Mean colour of the sampled pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorProfile {
    pub dominant_bucket: ColorBucket,
    pub rgb: Rgb,
}

impl ColorProfile {
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self {
            dominant_bucket: classify_rgb(rgb),
            rgb,
        }
    }
}

/// Map a mean colour to its bucket.
///
/// Rules are checked in order; the first hit wins. Yellow is tested before
/// orange because the orange band is a superset on the red and blue axes.
pub fn classify_rgb(rgb: Rgb) -> ColorBucket {
    let Rgb { r, g, b } = rgb;

    if r > 200 && g > 200 && b > 200 {
        return ColorBucket::White;
    }
    // burnt or very dark plates
    if r < 60 && g < 60 && b < 60 {
        return ColorBucket::Black;
    }
    if g > r && g > b {
        return ColorBucket::Green;
    }
    if r > 200 && g > 150 && b < 100 {
        return ColorBucket::Yellow;
    }
    if r > 200 && g > 100 && b < 50 {
        return ColorBucket::Orange;
    }
    if r > 150 && g < 100 && b < 100 {
        return ColorBucket::Red;
    }
    if r > 100 && g > 80 && b < 60 {
        return ColorBucket::Brown;
    }
    ColorBucket::Unknown
}
