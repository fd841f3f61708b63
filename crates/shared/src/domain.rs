use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(TwinId);
id_newtype!(SessionId);

/// A synthetic persona as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Twin {
    pub id: TwinId,
    pub name: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub communication_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Twin fields without an id; the body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwinDraft {
    pub name: String,
    pub personality: String,
    pub interests: String,
    pub communication_style: String,
}

impl TwinDraft {
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwinPreset {
    pub name: &'static str,
    pub personality: &'static str,
    pub interests: &'static str,
    pub communication_style: &'static str,
}

impl From<&TwinPreset> for TwinDraft {
    fn from(preset: &TwinPreset) -> Self {
        Self {
            name: preset.name.to_string(),
            personality: preset.personality.to_string(),
            interests: preset.interests.to_string(),
            communication_style: preset.communication_style.to_string(),
        }
    }
}

pub const TWIN_PRESETS: [TwinPreset; 4] = [
    TwinPreset {
        name: "Alex",
        personality: "Introverted, analytical, dry humor",
        interests: "coding, chess, sci-fi movies",
        communication_style: "direct",
    },
    TwinPreset {
        name: "Jordan",
        personality: "Extroverted, empathetic, spontaneous",
        interests: "hiking, live music, cooking",
        communication_style: "warm",
    },
    TwinPreset {
        name: "Sam",
        personality: "Ambivert, creative, thoughtful",
        interests: "art, podcasts, coffee shops",
        communication_style: "playful",
    },
    TwinPreset {
        name: "Riley",
        personality: "Confident, adventurous, witty",
        interests: "travel, photography, startups",
        communication_style: "bold",
    },
];

pub fn find_preset(name: &str) -> Option<&'static TwinPreset> {
    TWIN_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

pub const DATE_GOALS: [&str; 5] = [
    "First coffee date",
    "Fun adventurous outing",
    "Deep meaningful conversation",
    "Creative collaboration session",
    "Casual hangout & get to know each other",
];
