//! Step wizard: one session struct, explicit steps, guarded transitions.

use shared::{
    domain::{SessionId, TwinId},
    protocol::{MatchResult, Plan, Simulation},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Twins,
    Match,
    Plan,
    Sim,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Twins, Step::Match, Step::Plan, Step::Sim];

    pub fn label(self) -> &'static str {
        match self {
            Self::Twins => "twins",
            Self::Match => "match",
            Self::Plan => "plan",
            Self::Sim => "sim",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Twins => 0,
            Self::Match => 1,
            Self::Plan => 2,
            Self::Sim => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "Person A",
            Self::B => "Person B",
        }
    }
}

/// At most two distinct twins, one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    a: Option<TwinId>,
    b: Option<TwinId>,
}

impl Selection {
    /// Deselects an already selected twin, otherwise fills the first free
    /// slot. With both slots taken a new twin is ignored. Returns whether
    /// anything changed.
    pub fn toggle(&mut self, id: &TwinId) -> bool {
        if self.a.as_ref() == Some(id) {
            self.a = None;
        } else if self.b.as_ref() == Some(id) {
            self.b = None;
        } else if self.a.is_none() {
            self.a = Some(id.clone());
        } else if self.b.is_none() {
            self.b = Some(id.clone());
        } else {
            return false;
        }
        true
    }

    pub fn remove(&mut self, id: &TwinId) {
        if self.a.as_ref() == Some(id) {
            self.a = None;
        }
        if self.b.as_ref() == Some(id) {
            self.b = None;
        }
    }

    pub fn slot_of(&self, id: &TwinId) -> Option<Slot> {
        if self.a.as_ref() == Some(id) {
            Some(Slot::A)
        } else if self.b.as_ref() == Some(id) {
            Some(Slot::B)
        } else {
            None
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&TwinId> {
        match slot {
            Slot::A => self.a.as_ref(),
            Slot::B => self.b.as_ref(),
        }
    }

    pub fn pair(&self) -> Option<(&TwinId, &TwinId)> {
        Some((self.a.as_ref()?, self.b.as_ref()?))
    }

    pub fn len(&self) -> usize {
        usize::from(self.a.is_some()) + usize::from(self.b.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move from {from:?} to {to:?}")]
    NotAllowed { from: Step, to: Step },
    #[error("select two twins before matching")]
    IncompleteSelection,
    #[error("no compatibility analysis yet; run a match first")]
    MissingMatch,
    #[error("no active session; run a match first")]
    MissingSession,
    #[error("no date plan yet; generate one first")]
    MissingPlan,
}

/// What the current step may render, with its upstream payloads borrowed.
#[derive(Debug, Clone, Copy)]
pub enum StepView<'a> {
    Twins {
        selection: &'a Selection,
    },
    Match {
        analysis: &'a MatchResult,
        session_id: &'a SessionId,
    },
    Plan {
        session_id: &'a SessionId,
        plan: Option<&'a Plan>,
    },
    Sim {
        session_id: &'a SessionId,
        plan: &'a Plan,
        simulation: Option<&'a Simulation>,
    },
}

impl StepView<'_> {
    pub fn step(&self) -> Step {
        match self {
            Self::Twins { .. } => Step::Twins,
            Self::Match { .. } => Step::Match,
            Self::Plan { .. } => Step::Plan,
            Self::Sim { .. } => Step::Sim,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    step: Step,
    selection: Selection,
    match_result: Option<MatchResult>,
    session_id: Option<SessionId>,
    plan: Option<Plan>,
    simulation: Option<Simulation>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            step: Step::Twins,
            selection: Selection::default(),
            match_result: None,
            session_id: None,
            plan: None,
            simulation: None,
        }
    }

    /// The step actually rendered; equals the stored step whenever its
    /// payloads are present.
    pub fn current_step(&self) -> Step {
        self.view().step()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[cfg(test)]
    pub fn match_result(&self) -> Option<&MatchResult> {
        self.match_result.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    #[cfg(test)]
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn view(&self) -> StepView<'_> {
        let twins = StepView::Twins {
            selection: &self.selection,
        };
        match self.step {
            Step::Twins => twins,
            Step::Match => match (&self.match_result, &self.session_id) {
                (Some(analysis), Some(session_id)) => StepView::Match {
                    analysis,
                    session_id,
                },
                _ => twins,
            },
            Step::Plan => match &self.session_id {
                Some(session_id) => StepView::Plan {
                    session_id,
                    plan: self.plan.as_ref(),
                },
                None => twins,
            },
            Step::Sim => match (&self.session_id, &self.plan) {
                (Some(session_id), Some(plan)) => StepView::Sim {
                    session_id,
                    plan,
                    simulation: self.simulation.as_ref(),
                },
                _ => twins,
            },
        }
    }

    fn require_step(&self, expected: Step, to: Step) -> Result<(), TransitionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                from: self.step,
                to,
            })
        }
    }

    pub fn toggle_twin(&mut self, id: &TwinId) -> Result<bool, TransitionError> {
        self.require_step(Step::Twins, Step::Twins)?;
        Ok(self.selection.toggle(id))
    }

    /// A twin that no longer exists cannot stay selected.
    pub fn forget_twin(&mut self, id: &TwinId) {
        self.selection.remove(id);
    }

    /// The pair to send to the match endpoint.
    pub fn match_request(&self) -> Result<(TwinId, TwinId), TransitionError> {
        self.require_step(Step::Twins, Step::Match)?;
        let (a, b) = self
            .selection
            .pair()
            .ok_or(TransitionError::IncompleteSelection)?;
        Ok((a.clone(), b.clone()))
    }

    /// Twins → Match. A new session invalidates any plan or simulation.
    pub fn complete_match(
        &mut self,
        session_id: SessionId,
        analysis: MatchResult,
    ) -> Result<(), TransitionError> {
        self.match_request()?;
        self.session_id = Some(session_id);
        self.match_result = Some(analysis);
        self.plan = None;
        self.simulation = None;
        self.step = Step::Match;
        Ok(())
    }

    /// Match → Plan, no request.
    pub fn proceed_to_plan(&mut self) -> Result<(), TransitionError> {
        self.require_step(Step::Match, Step::Plan)?;
        if self.match_result.is_none() {
            return Err(TransitionError::MissingMatch);
        }
        if self.session_id.is_none() {
            return Err(TransitionError::MissingSession);
        }
        self.step = Step::Plan;
        Ok(())
    }

    /// Match → Twins, keeping the session and analysis.
    pub fn back_to_twins(&mut self) -> Result<(), TransitionError> {
        self.require_step(Step::Match, Step::Twins)?;
        self.step = Step::Twins;
        Ok(())
    }

    /// The session a plan request must be threaded through.
    pub fn plan_request(&self) -> Result<SessionId, TransitionError> {
        self.require_step(Step::Plan, Step::Plan)?;
        self.session_id
            .clone()
            .ok_or(TransitionError::MissingSession)
    }

    /// Plan → Sim carrying the plan. A different plan drops the old simulation.
    pub fn complete_plan(&mut self, plan: Plan) -> Result<(), TransitionError> {
        self.require_step(Step::Plan, Step::Sim)?;
        if self.session_id.is_none() {
            return Err(TransitionError::MissingSession);
        }
        if self.plan.as_ref() != Some(&plan) {
            self.simulation = None;
        }
        self.plan = Some(plan);
        self.step = Step::Sim;
        Ok(())
    }

    /// Plan → Match.
    pub fn back_to_match(&mut self) -> Result<(), TransitionError> {
        self.require_step(Step::Plan, Step::Match)?;
        if self.match_result.is_none() {
            return Err(TransitionError::MissingMatch);
        }
        self.step = Step::Match;
        Ok(())
    }

    pub fn simulation_request(&self) -> Result<SessionId, TransitionError> {
        self.require_step(Step::Sim, Step::Sim)?;
        if self.plan.is_none() {
            return Err(TransitionError::MissingPlan);
        }
        self.session_id
            .clone()
            .ok_or(TransitionError::MissingSession)
    }

    /// Stores a simulation result. A late result is still accepted as long
    /// as the session it belongs to is the current one.
    pub fn record_simulation(
        &mut self,
        session_id: &SessionId,
        simulation: Simulation,
    ) -> Result<(), TransitionError> {
        match &self.session_id {
            Some(current) if current == session_id => {}
            _ => return Err(TransitionError::MissingSession),
        }
        if self.plan.is_none() {
            return Err(TransitionError::MissingPlan);
        }
        self.simulation = Some(simulation);
        Ok(())
    }

    /// Sim → Plan.
    pub fn back_to_plan(&mut self) -> Result<(), TransitionError> {
        self.require_step(Step::Sim, Step::Plan)?;
        self.step = Step::Plan;
        Ok(())
    }

    /// Clears everything from any step.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
