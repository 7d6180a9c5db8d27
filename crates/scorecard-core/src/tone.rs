//! Status-color normalization and tone classification.
//!
//! Upstream data carries cell status as a loosely typed token: sometimes a
//! hex code, sometimes an English name, in varying case. Normalization
//! happens exactly once, at the ingestion boundary, into [`StatusColor`];
//! everything downstream works with the enum. Display classification maps a
//! status color to a [`Tone`], and [`TonePalette`] carries the saturated
//! (parent row) and lightened (child row) hex pair for each tone.

use serde::{Deserialize, Serialize};

/// Normalized cell status color.
///
/// Unrecognized or absent tokens normalize to [`StatusColor::Grey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum StatusColor {
    /// Below the limit threshold.
    Red,
    /// Between trigger and limit.
    Amber,
    /// At or above the trigger threshold.
    Green,
    /// No data, or an unrecognized token.
    #[default]
    Grey,
}

impl StatusColor {
    /// Parse a raw status token.
    ///
    /// Accepts hex and name synonyms, case-insensitively. Anything not in
    /// the known token set is treated as grey rather than an error.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "#e61622" | "red" => Self::Red,
            "#ffbf00" | "amber" => Self::Amber,
            "#009223" | "green" => Self::Green,
            _ => Self::Grey,
        }
    }

    /// Get the canonical token name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Green => "green",
            Self::Grey => "grey",
        }
    }

    /// Classify this status color into a display tone.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Red => Tone::Bad,
            Self::Amber => Tone::Warning,
            Self::Green => Tone::Good,
            Self::Grey => Tone::Neutral,
        }
    }
}

impl From<String> for StatusColor {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<StatusColor> for String {
    fn from(color: StatusColor) -> Self {
        color.name().to_string()
    }
}

/// Display tone of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Positive/on-target.
    Good,
    /// Needs attention.
    Warning,
    /// Off-target.
    Bad,
    /// No data.
    #[default]
    Neutral,
}

impl Tone {
    /// Get the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
            Self::Neutral => "neutral",
        }
    }

    /// Get all tones.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Good, Self::Warning, Self::Bad, Self::Neutral]
    }
}

/// A saturated/lightened hex pair for one tone family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TonePair {
    /// Saturated variant used for parent rows.
    pub parent: &'static str,
    /// Lightened variant used for child rows.
    pub child: &'static str,
}

/// Hex palette mapping tones to their parent/child pair.
///
/// The default values are the canonical scorecard palette; the terminal
/// layer converts them to whatever its backend needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TonePalette {
    pub good: TonePair,
    pub warning: TonePair,
    pub bad: TonePair,
    pub neutral: TonePair,
}

impl TonePalette {
    /// Get the pair for a tone.
    #[must_use]
    pub const fn pair(&self, tone: Tone) -> TonePair {
        match tone {
            Tone::Good => self.good,
            Tone::Warning => self.warning,
            Tone::Bad => self.bad,
            Tone::Neutral => self.neutral,
        }
    }

    /// Get the hex value for a tone and row kind.
    #[must_use]
    pub const fn hex(&self, tone: Tone, is_parent: bool) -> &'static str {
        let pair = self.pair(tone);
        if is_parent { pair.parent } else { pair.child }
    }
}

impl Default for TonePalette {
    fn default() -> Self {
        Self {
            good: TonePair {
                parent: "#009922",
                child: "#99D3A7",
            },
            warning: TonePair {
                parent: "#EA7600",
                child: "#f7c899",
            },
            bad: TonePair {
                parent: "#94002B",
                child: "#dfb2bf",
            },
            neutral: TonePair {
                parent: "#c6c6c6",
                child: "#d3d3d3",
            },
        }
    }
}
