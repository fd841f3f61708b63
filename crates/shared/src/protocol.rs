use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{SessionId, TwinId};

pub const DEFAULT_SIM_ROUNDS: u32 = 6;

/// Scores come back from an LLM and are not guaranteed to be numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Percent(f64),
    Text(String),
}

impl Score {
    pub fn label(&self) -> String {
        match self {
            Self::Percent(value) => format!("{value}%"),
            Self::Text(text) => text.clone(),
        }
    }

    pub fn as_percent(&self) -> Option<f64> {
        match self {
            Self::Percent(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

/// A display-only count or duration: a number when the model behaves,
/// free text when it does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
}

impl Figure {
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        };
        value.filter(|value: &f64| value.is_finite())
    }

    /// Whole numbers from 1 up, e.g. a round or a step position.
    pub fn as_ordinal(&self) -> Option<u32> {
        let value = self.as_number()?;
        (value >= 1.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX))
            .then_some(value as u32)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Number(value) => format!("{value}"),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<u32> for Figure {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Accepts numeric strings too; anything unreadable counts as 0.
fn loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(value.filter(|value| value.is_finite()).unwrap_or(0.0))
}

/// A list of strings, or a single string standing in for a one-item list.
fn loose_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    Ok(items.into_iter().filter_map(list_item).collect())
}

fn list_item(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn score_label(score: Option<&Score>, raw: Option<&str>) -> String {
    match (score, raw) {
        (Some(score), _) => score.label(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "?".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default)]
    pub compatibility_score: Option<Score>,
    #[serde(default, deserialize_with = "loose_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "loose_list")]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub tip: Option<String>,
    /// Unparsed model output, present when the backend could not decode it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl MatchResult {
    pub fn score_label(&self) -> String {
        score_label(self.compatibility_score.as_ref(), self.raw.as_deref())
    }

    pub fn tip(&self) -> Option<&str> {
        self.tip.as_deref().filter(|tip| !tip.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(default)]
    pub order: Option<Figure>,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub duration_min: Option<Figure>,
    #[serde(default)]
    pub vibe: String,
}

impl PlanStep {
    /// The reported order, or the 1-based position when absent.
    pub fn display_order(&self, index: usize) -> u32 {
        self.order
            .as_ref()
            .and_then(Figure::as_ordinal)
            .unwrap_or(index as u32 + 1)
    }

    /// `30 min` for numeric durations; free text is shown as given.
    pub fn duration_label(&self) -> Option<String> {
        let duration = self.duration_min.as_ref()?;
        let label = duration.label();
        if label.is_empty() {
            None
        } else if duration.as_number().is_some() {
            Some(format!("{label} min"))
        } else {
            Some(label)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
    #[serde(default, deserialize_with = "loose_list")]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Plan {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or("Your Date Plan")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    #[serde(default)]
    pub round: Option<Figure>,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub message: String,
    /// Expected in 0..=100; not clamped.
    #[serde(default, deserialize_with = "loose_number")]
    pub engagement_score: f64,
}

impl Exchange {
    /// `R{round}`, falling back to the 1-based position when the round is
    /// missing, zero or unreadable.
    pub fn round_label(&self, index: usize) -> String {
        match self.round.as_ref().and_then(Figure::as_ordinal) {
            Some(round) => format!("R{round}"),
            None => format!("R{}", index + 1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    #[serde(default)]
    pub overall_score: Option<Score>,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Simulation {
    pub fn score_label(&self) -> String {
        score_label(self.overall_score.as_ref(), None)
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|summary| !summary.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwinCreated {
    pub id: TwinId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub twin_a_id: TwinId,
    pub twin_b_id: TwinId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub session_id: SessionId,
    #[serde(default)]
    pub analysis: MatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub session_id: SessionId,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub plan: Plan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRequest {
    pub session_id: SessionId,
    pub rounds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimResponse {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub simulation: Simulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub ts: Option<NaiveDateTime>,
}
