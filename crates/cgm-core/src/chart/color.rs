//! Color string parsing
//!
//! Parses the color strings users put in their settings into normalized RGB
//! triples. The accepted syntax follows what desktop color pickers emit:
//!
//! - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `#rrrgggbbb`, `#rrrrggggbbbb`
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)`, components 0-255 or percentages
//! - `hsl(h, s%, l%)` and `hsla(h, s%, l%, a)`
//! - common CSS color names, case-insensitive
//!
//! Alpha is validated and dropped; the chart always draws opaque.

use core::str::FromStr;

use embedded_graphics::pixelcolor::Rgb888;
use heapless::Vec;
use thiserror_no_std::Error;

use crate::math::{floor_f32, round_f32};

/// Error returned when a color string cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Input was empty or whitespace
    #[error("empty color string")]
    Empty,

    /// `#` followed by a bad digit count or non-hex characters
    #[error("invalid hex color")]
    InvalidHex,

    /// Function name other than rgb/rgba/hsl/hsla
    #[error("unknown color function")]
    UnknownFunction,

    /// Function call without a closing parenthesis
    #[error("malformed color function")]
    MalformedFunction,

    /// Function called with the wrong number of arguments
    #[error("wrong number of color components")]
    WrongComponentCount,

    /// A component that is not a finite number
    #[error("invalid color component")]
    InvalidComponent,

    /// Not a known color name
    #[error("unknown color name")]
    UnknownName,
}

/// An RGB color with each channel in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRgb {
    /// Red channel
    pub red: f32,
    /// Green channel
    pub green: f32,
    /// Blue channel
    pub blue: f32,
}

impl NormalizedRgb {
    /// Create a color from normalized channels
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Create a color from 8-bit channels
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Channels as an `[r, g, b]` array
    pub fn components(self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }

    /// Quantize to the 24-bit draw color
    pub fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }
}

impl From<NormalizedRgb> for Rgb888 {
    fn from(color: NormalizedRgb) -> Self {
        color.to_rgb888()
    }
}

impl FromStr for NormalizedRgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    round_f32(channel.clamp(0.0, 1.0) * 255.0) as u8
}

/// Parse a color string into a normalized RGB triple
pub fn parse_color(input: &str) -> Result<NormalizedRgb, ColorParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(digits) = trimmed.strip_prefix('#') {
        return parse_hex(digits);
    }

    if let Some(open) = trimmed.find('(') {
        let name = trimmed[..open].trim();
        let args = trimmed[open + 1..]
            .strip_suffix(')')
            .ok_or(ColorParseError::MalformedFunction)?;
        return parse_function(name, args);
    }

    lookup_named(trimmed).ok_or(ColorParseError::UnknownName)
}

/// Parse the digits after `#`
///
/// Every channel uses the same digit width; a fourth channel is alpha.
fn parse_hex(digits: &str) -> Result<NormalizedRgb, ColorParseError> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidHex);
    }

    let width = match digits.len() {
        3 | 4 => 1,
        6 | 8 => 2,
        9 => 3,
        12 => 4,
        _ => return Err(ColorParseError::InvalidHex),
    };

    let max = ((1u32 << (4 * width)) - 1) as f32;
    let channel = |index: usize| -> Result<f32, ColorParseError> {
        let start = index * width;
        let raw = digits
            .get(start..start + width)
            .ok_or(ColorParseError::InvalidHex)?;
        u32::from_str_radix(raw, 16)
            .map(|value| value as f32 / max)
            .map_err(|_| ColorParseError::InvalidHex)
    };

    Ok(NormalizedRgb::new(channel(0)?, channel(1)?, channel(2)?))
}

fn parse_function(name: &str, args: &str) -> Result<NormalizedRgb, ColorParseError> {
    let (is_hsl, expected) = if name.eq_ignore_ascii_case("rgb") {
        (false, 3)
    } else if name.eq_ignore_ascii_case("rgba") {
        (false, 4)
    } else if name.eq_ignore_ascii_case("hsl") {
        (true, 3)
    } else if name.eq_ignore_ascii_case("hsla") {
        (true, 4)
    } else {
        return Err(ColorParseError::UnknownFunction);
    };

    let mut parts: Vec<&str, 4> = Vec::new();
    for part in args.split(',') {
        parts
            .push(part.trim())
            .map_err(|_| ColorParseError::WrongComponentCount)?;
    }

    if parts.len() != expected {
        return Err(ColorParseError::WrongComponentCount);
    }

    if let Some(alpha) = parts.get(3) {
        parse_unit_component(alpha, 1.0)?;
    }

    if is_hsl {
        let hue = parse_number(parts[0])?;
        let saturation = parse_percentage(parts[1])?;
        let lightness = parse_percentage(parts[2])?;
        Ok(hsl_to_rgb(hue, saturation, lightness))
    } else {
        Ok(NormalizedRgb::new(
            parse_unit_component(parts[0], 255.0)?,
            parse_unit_component(parts[1], 255.0)?,
            parse_unit_component(parts[2], 255.0)?,
        ))
    }
}

fn parse_number(text: &str) -> Result<f32, ColorParseError> {
    text.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ColorParseError::InvalidComponent)
}

/// Channel given as a plain number over `scale` or as a percentage, clamped to `[0, 1]`
fn parse_unit_component(text: &str, scale: f32) -> Result<f32, ColorParseError> {
    let value = match text.strip_suffix('%') {
        Some(percent) => parse_number(percent.trim())? / 100.0,
        None => parse_number(text)? / scale,
    };
    Ok(value.clamp(0.0, 1.0))
}

fn parse_percentage(text: &str) -> Result<f32, ColorParseError> {
    let percent = text
        .strip_suffix('%')
        .ok_or(ColorParseError::InvalidComponent)?;
    Ok((parse_number(percent.trim())? / 100.0).clamp(0.0, 1.0))
}

/// Convert HSL (hue in degrees, saturation and lightness in `[0, 1]`) to RGB
fn hsl_to_rgb(hue_degrees: f32, saturation: f32, lightness: f32) -> NormalizedRgb {
    let turns = hue_degrees / 360.0;
    let hue = turns - floor_f32(turns);

    if saturation <= 0.0 {
        return NormalizedRgb::new(lightness, lightness, lightness);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    NormalizedRgb::new(
        hue_to_channel(p, q, hue + 1.0 / 3.0),
        hue_to_channel(p, q, hue),
        hue_to_channel(p, q, hue - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn lookup_named(name: &str) -> Option<NormalizedRgb> {
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, [r, g, b])| NormalizedRgb::from_rgb8(*r, *g, *b))
}

/// Named colors (CSS values)
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("beige", [245, 245, 220]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkorange", [255, 140, 0]),
    ("darkred", [139, 0, 0]),
    ("deeppink", [255, 20, 147]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("firebrick", [178, 34, 34]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("hotpink", [255, 105, 180]),
    ("indigo", [75, 0, 130]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lightblue", [173, 216, 230]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("salmon", [250, 128, 114]),
    ("seagreen", [46, 139, 87]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
];
