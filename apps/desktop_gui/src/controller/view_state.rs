//! Local state owned by each wizard view: form fields, busy flags, inline errors.

use shared::{
    domain::{TwinDraft, TwinId, DATE_GOALS},
    protocol::{Plan, DEFAULT_SIM_ROUNDS},
};

use crate::controller::{events::UiError, wizard::Selection};

#[derive(Debug, Clone, Default)]
pub struct TwinPickerState {
    pub form: TwinDraft,
    pub loading_list: bool,
    /// A reload was asked for while a list request was outstanding.
    pub reload_pending: bool,
    pub adding: bool,
    pub matching: bool,
    pub deleting: Option<TwinId>,
    /// Set when the last create came from the form rather than a preset.
    pub clear_form_on_create: bool,
    pub error: Option<UiError>,
}

impl TwinPickerState {
    pub fn can_add(&self) -> bool {
        !self.adding && self.form.is_submittable()
    }

    pub fn can_add_preset(&self) -> bool {
        !self.adding
    }

    pub fn can_match(&self, selection: &Selection) -> bool {
        !self.matching && selection.pair().is_some()
    }

    pub fn can_delete(&self) -> bool {
        self.deleting.is_none()
    }

    pub fn add_button_label(&self) -> &'static str {
        if self.adding {
            "Adding..."
        } else {
            "Add Custom Twin"
        }
    }

    pub fn match_button_label(&self) -> &'static str {
        if self.matching {
            "Analyzing compatibility..."
        } else {
            "Match These Twins"
        }
    }
}

/// Preset goal or free text; never both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GoalChoice {
    #[default]
    Unset,
    Preset(&'static str),
    Custom(String),
}

#[derive(Debug, Clone, Default)]
pub struct PlannerState {
    goal: GoalChoice,
    pub loading: bool,
    pub preview: Option<Plan>,
    pub error: Option<UiError>,
}

impl PlannerState {
    pub fn selected_preset(&self) -> Option<&'static str> {
        match self.goal {
            GoalChoice::Preset(goal) => Some(goal),
            _ => None,
        }
    }

    pub fn custom_text(&self) -> &str {
        match &self.goal {
            GoalChoice::Custom(text) => text,
            _ => "",
        }
    }

    /// Only the preset goals are accepted here; anything else is ignored.
    pub fn select_preset(&mut self, goal: &str) {
        if let Some(preset) = DATE_GOALS.iter().find(|candidate| **candidate == goal) {
            self.goal = GoalChoice::Preset(preset);
        }
    }

    pub fn edit_custom(&mut self, text: String) {
        self.goal = if text.is_empty() {
            GoalChoice::Unset
        } else {
            GoalChoice::Custom(text)
        };
    }

    /// The goal to send, if any.
    pub fn effective_goal(&self) -> Option<String> {
        match &self.goal {
            GoalChoice::Unset => None,
            GoalChoice::Preset(goal) => Some((*goal).to_string()),
            GoalChoice::Custom(text) if text.trim().is_empty() => None,
            GoalChoice::Custom(text) => Some(text.trim().to_string()),
        }
    }

    pub fn can_generate(&self) -> bool {
        !self.loading && self.effective_goal().is_some()
    }

    pub fn generate_button_label(&self) -> &'static str {
        if self.loading {
            "Generating plan..."
        } else {
            "Generate Date Plan"
        }
    }
}

pub const MAX_SIM_ROUNDS: u32 = 12;

#[derive(Debug, Clone)]
pub struct SimViewState {
    pub loading: bool,
    pub rounds: u32,
    pub error: Option<UiError>,
}

impl Default for SimViewState {
    fn default() -> Self {
        Self {
            loading: false,
            rounds: DEFAULT_SIM_ROUNDS,
            error: None,
        }
    }
}

impl SimViewState {
    pub fn set_rounds(&mut self, rounds: u32) {
        self.rounds = rounds.clamp(1, MAX_SIM_ROUNDS);
    }

    pub fn can_run(&self) -> bool {
        !self.loading
    }

    pub fn run_button_label(&self, has_result: bool) -> &'static str {
        match (self.loading, has_result) {
            (true, _) => "Simulating conversation...",
            (false, false) => "Run Simulation",
            (false, true) => "Re-run Simulation",
        }
    }
}
