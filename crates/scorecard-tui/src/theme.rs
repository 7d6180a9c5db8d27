//! Theme definitions for the scorecard dashboard.
//!
//! Chrome colors come in two presets; cell backgrounds come from the core
//! tone palette, saturated for parent rows and lightened for child rows.

use crossterm::style::Color;
use scorecard_core::{Tone, TonePalette};

/// Theme preset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreset {
    #[default]
    Dark,
    Light,
}

impl ThemePreset {
    /// Get the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Look up a preset by name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Semantic colors for the dashboard chrome plus the cell tone palette.
#[derive(Debug, Clone)]
pub struct Theme {
    pub preset: ThemePreset,
    /// Primary text.
    pub text: Color,
    /// Hints, timestamps, secondary text.
    pub text_muted: Color,
    /// Accent for the selected row and headings.
    pub accent: Color,
    /// Table borders and dividers.
    pub border: Color,
    /// Cell tone palette (hex, shared with the core).
    pub palette: TonePalette,
}

impl Theme {
    /// Build a theme from a preset.
    #[must_use]
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Dark => Self {
                preset,
                text: Color::Rgb {
                    r: 0xe6,
                    g: 0xe6,
                    b: 0xe6,
                },
                text_muted: Color::Rgb {
                    r: 0x8a,
                    g: 0x8a,
                    b: 0x8a,
                },
                accent: Color::Rgb {
                    r: 0x7a,
                    g: 0xa2,
                    b: 0xf7,
                },
                border: Color::Rgb {
                    r: 0x3b,
                    g: 0x3b,
                    b: 0x3b,
                },
                palette: TonePalette::default(),
            },
            ThemePreset::Light => Self {
                preset,
                text: Color::Rgb {
                    r: 0x1a,
                    g: 0x1a,
                    b: 0x1a,
                },
                text_muted: Color::Rgb {
                    r: 0x66,
                    g: 0x66,
                    b: 0x66,
                },
                accent: Color::Rgb {
                    r: 0x1d,
                    g: 0x4e,
                    b: 0xd8,
                },
                border: Color::Rgb {
                    r: 0xc4,
                    g: 0xc4,
                    b: 0xc4,
                },
                palette: TonePalette::default(),
            },
        }
    }

    /// Background color for a cell tone and row kind.
    #[must_use]
    pub fn tone_bg(&self, tone: Tone, is_parent: bool) -> Color {
        hex_color(self.palette.hex(tone, is_parent))
    }

    /// Foreground color readable on the corresponding tone background.
    ///
    /// Saturated parent tones take white text; lightened child tones and
    /// the neutral family take near-black.
    #[must_use]
    pub const fn tone_fg(tone: Tone, is_parent: bool) -> Color {
        if is_parent && !matches!(tone, Tone::Neutral) {
            Color::Rgb {
                r: 0xff,
                g: 0xff,
                b: 0xff,
            }
        } else {
            Color::Rgb {
                r: 0x20,
                g: 0x20,
                b: 0x20,
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_preset(ThemePreset::default())
    }
}

/// Parse a `#RRGGBB` hex string into an RGB color.
///
/// Malformed values fall back to the terminal default rather than failing.
#[must_use]
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Color::Reset;
    }
    let Ok(value) = u32::from_str_radix(digits, 16) else {
        return Color::Reset;
    };
    #[allow(clippy::cast_possible_truncation)]
    Color::Rgb {
        r: (value >> 16) as u8,
        g: (value >> 8 & 0xff) as u8,
        b: (value & 0xff) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(
            hex_color("#94002B"),
            Color::Rgb {
                r: 0x94,
                g: 0x00,
                b: 0x2b
            }
        );
        assert_eq!(hex_color("not-a-color"), Color::Reset);
        assert_eq!(hex_color("#fff"), Color::Reset);
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        assert_eq!(ThemePreset::from_name("Dark"), Some(ThemePreset::Dark));
        assert_eq!(ThemePreset::from_name("LIGHT"), Some(ThemePreset::Light));
        assert_eq!(ThemePreset::from_name("dracula"), None);
    }

    #[test]
    fn parent_and_child_backgrounds_differ() {
        let theme = Theme::default();
        for tone in Tone::all() {
            assert_ne!(theme.tone_bg(tone, true), theme.tone_bg(tone, false));
        }
    }

    #[test]
    fn parent_saturated_tones_take_white_text() {
        assert_eq!(
            Theme::tone_fg(Tone::Bad, true),
            Color::Rgb {
                r: 0xff,
                g: 0xff,
                b: 0xff
            }
        );
        assert_ne!(Theme::tone_fg(Tone::Bad, false), Theme::tone_fg(Tone::Bad, true));
        assert_ne!(
            Theme::tone_fg(Tone::Neutral, true),
            Theme::tone_fg(Tone::Bad, true)
        );
    }
}
