//! Auto-or-length used values.
//!
//! [§ 6.1 Used Values](https://www.w3.org/TR/css-cascade-4/#used)

use serde::{Deserialize, Serialize};

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// This enum represents a value that can either be 'auto' or a specific length.
/// In JSON it is written as the string `"auto"` or a number of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "AutoOrRepr", into = "AutoOrRepr")]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    #[default]
    Auto,
    /// The value is a specific length in pixels.
    Length(f64),
}

impl AutoOr {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Get the length value, or a default if 'auto'.
    #[must_use]
    pub const fn to_px_or(self, default: f64) -> f64 {
        match self {
            Self::Length(v) => v,
            Self::Auto => default,
        }
    }

    /// The length, or `None` for 'auto'.
    #[must_use]
    pub const fn length(self) -> Option<f64> {
        match self {
            Self::Length(v) => Some(v),
            Self::Auto => None,
        }
    }

    /// Apply `f` to the length, keeping 'auto' as is.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Length(v) => Self::Length(f(v)),
            Self::Auto => Self::Auto,
        }
    }
}

impl From<f64> for AutoOr {
    fn from(px: f64) -> Self {
        Self::Length(px)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AutoOrRepr {
    Length(f64),
    Keyword(String),
}

impl TryFrom<AutoOrRepr> for AutoOr {
    type Error = String;

    fn try_from(repr: AutoOrRepr) -> Result<Self, Self::Error> {
        match repr {
            AutoOrRepr::Length(px) => Ok(Self::Length(px)),
            AutoOrRepr::Keyword(k) if k == "auto" => Ok(Self::Auto),
            AutoOrRepr::Keyword(k) => Err(format!("expected a length or 'auto', got '{k}'")),
        }
    }
}

impl From<AutoOr> for AutoOrRepr {
    fn from(value: AutoOr) -> Self {
        match value {
            AutoOr::Auto => Self::Keyword("auto".to_string()),
            AutoOr::Length(px) => Self::Length(px),
        }
    }
}
