//! UI-agnostic data types
//!
//! These are shared between the API client and the screens and don't depend on
//! any UI framework.

use serde::{Deserialize, Serialize};

use crate::error::ToneOutOfRange;

/// Which voice the service should write the reply as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Male,
    Female,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Male => "male",
            Perspective::Female => "female",
        }
    }

    pub fn all() -> [Perspective; 2] {
        [Perspective::Male, Perspective::Female]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Perspective::Male => "Male Perspective",
            Perspective::Female => "Female Perspective",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Perspective::Male => Perspective::Female,
            Perspective::Female => Perspective::Male,
        }
    }
}

/// Reply tone from 1 (serious) to 5 (playful).
///
/// A value outside the range can't be constructed; stepping saturates at the
/// bounds. Serialises as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ToneLevel(u8);

impl ToneLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ToneOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ToneOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn raised(&self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    pub fn lowered(&self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for ToneLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for ToneLevel {
    type Error = ToneOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ToneLevel> for u8 {
    fn from(tone: ToneLevel) -> Self {
        tone.0
    }
}

/// One candidate reply returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}
