//! Session State
//!
//! The single mutable record of one learner's progress. Only the turn engine
//! mutates it; hosts hold it between actions and render it through
//! [`crate::view::SessionView`].

use crate::{
    corpus::{self, Scenario, ScenarioKind},
    log::{AutonomyAction, LogRole, SessionExport, SessionLog},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three activities, in the order a learner meets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    /// Reading annotated example dialogues.
    #[serde(rename = "activity1")]
    Noticing,
    /// Scripted debates with a peer or a boss.
    #[serde(rename = "activity2")]
    Debate,
    /// Role-play scenarios.
    #[serde(rename = "activity3")]
    RolePlay,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::Noticing => write!(f, "activity1"),
            Activity::Debate => write!(f, "activity2"),
            Activity::RolePlay => write!(f, "activity3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticingStep {
    Intro,
    FirstDialogue,
    SecondDialogue,
    Summary,
}

/// Steps shared by every scenario-driven activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeStep {
    /// Choosing a topic or scenario.
    Menu,
    Chat,
    Complete,
}

/// Activity x state-within-activity. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "step", rename_all = "snake_case")]
pub enum Stage {
    Welcome,
    Noticing(NoticingStep),
    Debate(PracticeStep),
    RolePlay(PracticeStep),
    Reflection,
    Complete,
}

impl Stage {
    pub fn activity(self) -> Option<Activity> {
        match self {
            Stage::Welcome => None,
            Stage::Noticing(_) => Some(Activity::Noticing),
            Stage::Debate(_) => Some(Activity::Debate),
            Stage::RolePlay(_) | Stage::Reflection | Stage::Complete => Some(Activity::RolePlay),
        }
    }

    /// Flat tag used in the interaction log and by views.
    pub fn tag(self) -> &'static str {
        match self {
            Stage::Welcome => "welcome",
            Stage::Noticing(NoticingStep::Intro) => "activity1_intro",
            Stage::Noticing(NoticingStep::FirstDialogue) => "show_dialogue1",
            Stage::Noticing(NoticingStep::SecondDialogue) => "show_dialogue2",
            Stage::Noticing(NoticingStep::Summary) => "activity1_summary",
            Stage::Debate(PracticeStep::Menu) => "activity2_intro",
            Stage::Debate(PracticeStep::Chat) => "debate_chat",
            Stage::Debate(PracticeStep::Complete) => "debate_complete",
            Stage::RolePlay(PracticeStep::Menu) => "activity3_intro",
            Stage::RolePlay(PracticeStep::Chat) => "scenario_chat",
            Stage::RolePlay(PracticeStep::Complete) => "scenario_complete",
            Stage::Reflection => "reflection",
            Stage::Complete => "complete",
        }
    }

    /// The practice step, if this stage belongs to a scenario-driven activity.
    pub fn practice(self) -> Option<(ScenarioKind, PracticeStep)> {
        match self {
            Stage::Debate(step) => Some((ScenarioKind::Debate, step)),
            Stage::RolePlay(step) => Some((ScenarioKind::RolePlay, step)),
            _ => None,
        }
    }

    pub fn is_chat(self) -> bool {
        matches!(self.practice(), Some((_, PracticeStep::Chat)))
    }

    pub(crate) fn practice_stage(kind: ScenarioKind, step: PracticeStep) -> Stage {
        match kind {
            ScenarioKind::Debate => Stage::Debate(step),
            ScenarioKind::RolePlay => Stage::RolePlay(step),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Learner,
    Partner,
}

/// One utterance in the active scenario's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn learner(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Learner,
            text: text.into(),
        }
    }

    pub fn partner(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Partner,
            text: text.into(),
        }
    }
}

/// How the learner produced a submitted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Voice,
    Text,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMethod::Voice => write!(f, "VOICE"),
            InputMethod::Text => write!(f, "TEXT"),
        }
    }
}

/// The aggregate root for one learner's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) student_name: Option<String>,
    pub(crate) stage: Stage,
    pub(crate) scenario_id: Option<String>,
    pub(crate) conversation: Vec<ConversationTurn>,
    pub(crate) turn_count: u32,
    pub(crate) scaffolding_shown: bool,
    pub(crate) pending_transcript: Option<String>,
    pub(crate) log: SessionLog,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            student_name: None,
            stage: Stage::Welcome,
            scenario_id: None,
            conversation: Vec::new(),
            turn_count: 0,
            scaffolding_shown: false,
            pending_transcript: None,
            log: SessionLog::default(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student_name(&self) -> Option<&str> {
        self.student_name.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stage tag as shown to hosts, `name_entry` until the learner is named.
    pub fn state_tag(&self) -> &'static str {
        match self.student_name {
            Some(_) => self.stage.tag(),
            None => "name_entry",
        }
    }

    pub fn activity(&self) -> Option<Activity> {
        self.stage.activity()
    }

    /// The selected debate topic or role-play scenario, if any.
    pub fn scenario(&self) -> Option<&'static Scenario> {
        self.scenario_id.as_deref().and_then(corpus::find_scenario)
    }

    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn scaffolding_shown(&self) -> bool {
        self.scaffolding_shown
    }

    pub fn pending_transcript(&self) -> Option<&str> {
        self.pending_transcript.as_deref()
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Appends an interaction tagged with the current activity and stage.
    pub fn log_interaction(&mut self, role: LogRole, content: impl Into<String>) {
        let activity = self.activity();
        let state = self.stage.tag();
        self.log.log_interaction(activity, state, role, content);
    }

    /// Appends an autonomy event tagged with the current activity.
    pub fn log_autonomy(&mut self, action: AutonomyAction) {
        let activity = self.activity();
        self.log.log_autonomy(activity, action);
    }

    /// Snapshot of the session for download. Never touches the logs.
    pub fn export(&self) -> SessionExport {
        SessionExport {
            student_name: self.student_name.clone(),
            session_start: self.log.session_start(),
            session_end: Utc::now(),
            interactions: self.log.interactions().to_vec(),
            autonomy_events: self.log.autonomy_events().to_vec(),
        }
    }

    /// File name offered for the exported log.
    pub fn export_file_name(&self, at: DateTime<Utc>) -> String {
        let name: String = self
            .student_name
            .as_deref()
            .unwrap_or("anonymous")
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!(
            "discussion_partner_log_{}_{}.json",
            name,
            at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Returns the session to its start-of-session defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Selects a scenario and seeds the conversation with its opening line.
    pub(crate) fn begin_scenario(&mut self, scenario: &'static Scenario) {
        self.scenario_id = Some(scenario.id.to_string());
        self.conversation = vec![ConversationTurn::partner(scenario.opening_line)];
        self.turn_count = 0;
        self.scaffolding_shown = false;
        self.pending_transcript = None;
    }

    /// Drops the conversation and its counters, keeping the logs.
    pub(crate) fn clear_conversation(&mut self) {
        self.scenario_id = None;
        self.conversation.clear();
        self.turn_count = 0;
        self.scaffolding_shown = false;
        self.pending_transcript = None;
    }
}
