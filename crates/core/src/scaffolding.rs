//! Scaffolding Policy
//!
//! Decides when corpus examples are put in front of the learner and what the
//! panel contains. Panels hold examples and open noticing questions only;
//! they never tell the learner what they should have said.

use crate::{
    corpus::{self, Register},
    log::AutonomyAction,
};
use serde::Serialize;

/// Examples surfaced per panel.
pub const EXAMPLES_PER_PANEL: usize = 4;

/// Why a panel is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Fired once per scenario instance, right after the learner's first reply.
    Automatic,
    /// The learner asked for help.
    OnDemand,
}

impl Trigger {
    pub fn autonomy_action(self) -> AutonomyAction {
        match self {
            Trigger::Automatic => AutonomyAction::ScaffoldingTurn1,
            Trigger::OnDemand => AutonomyAction::ExamplesRequest,
        }
    }
}

/// A panel of register-matched corpus examples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamplePanel {
    pub trigger: Trigger,
    pub register: Register,
    pub heading: &'static str,
    pub examples: Vec<&'static str>,
    pub noticing_questions: &'static [&'static str],
    pub closing: Option<&'static str>,
}

const LOW_POWER_QUESTIONS: &[&str] = &[
    "How do they start their disagreement?",
    "What words appear in most of these examples?",
    "Do they disagree directly or do they do something first?",
];

const HIGH_POWER_QUESTIONS: &[&str] = &[
    "How do they start their disagreement?",
    "Are these examples longer or shorter than casual conversations?",
    "What do they say BEFORE disagreeing?",
    "Do you see any words like \"maybe\", \"perhaps\", \"I think\"?",
];

/// True when the automatic panel must fire: the first learner reply of a
/// scenario has just been counted and the latch has not been set yet.
pub fn should_auto_scaffold(turn_count: u32, already_shown: bool) -> bool {
    turn_count == 1 && !already_shown
}

/// The one-shot panel shown after the first reply of a scenario.
pub fn automatic_panel(register: Register) -> ExamplePanel {
    let noticing_questions = match register {
        Register::LowPower => LOW_POWER_QUESTIONS,
        Register::HighPower => HIGH_POWER_QUESTIONS,
    };
    ExamplePanel {
        trigger: Trigger::Automatic,
        register,
        heading: "Let me show you how others disagreed in similar situations...",
        examples: corpus::examples(register, EXAMPLES_PER_PANEL),
        noticing_questions,
        closing: Some("Want to try your response again?"),
    }
}

/// The panel shown whenever the learner asks for help.
pub fn help_panel(register: Register) -> ExamplePanel {
    let heading = match register {
        Register::LowPower => "Examples of casual disagreements:",
        Register::HighPower => "Examples of professional disagreements:",
    };
    ExamplePanel {
        trigger: Trigger::OnDemand,
        register,
        heading,
        examples: corpus::examples(register, EXAMPLES_PER_PANEL),
        noticing_questions: &[],
        closing: None,
    }
}
