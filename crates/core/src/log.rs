//! Learner Activity Log
//!
//! Two append-only trails kept per session: every utterance and system
//! milestone (`interactions`) and every help-seeking or scaffolding event
//! (`autonomy_events`). Entries are never edited or read back by the
//! engine; they exist only to be exported at the end of a session.

use crate::session::Activity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a logged interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRole {
    System,
    Learner,
    Partner,
}

impl fmt::Display for LogRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRole::System => write!(f, "system"),
            LogRole::Learner => write!(f, "learner"),
            LogRole::Partner => write!(f, "partner"),
        }
    }
}

/// Tag recorded for an autonomy event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyAction {
    /// The learner asked to see examples.
    ExamplesRequest,
    /// Examples were surfaced automatically after the first reply of a scenario.
    #[serde(rename = "scaffolding_turn1")]
    ScaffoldingTurn1,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub activity: Option<Activity>,
    pub state: String,
    pub role: LogRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutonomyLogEntry {
    pub timestamp: DateTime<Utc>,
    pub activity: Option<Activity>,
    pub action: AutonomyAction,
}

/// The pair of append-only logs owned by a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    interactions: Vec<InteractionLogEntry>,
    autonomy_events: Vec<AutonomyLogEntry>,
}

impl SessionLog {
    pub fn log_interaction(
        &mut self,
        activity: Option<Activity>,
        state: &str,
        role: LogRole,
        content: impl Into<String>,
    ) {
        self.interactions.push(InteractionLogEntry {
            timestamp: Utc::now(),
            activity,
            state: state.to_string(),
            role,
            content: content.into(),
        });
    }

    pub fn log_autonomy(&mut self, activity: Option<Activity>, action: AutonomyAction) {
        self.autonomy_events.push(AutonomyLogEntry {
            timestamp: Utc::now(),
            activity,
            action,
        });
    }

    pub fn interactions(&self) -> &[InteractionLogEntry] {
        &self.interactions
    }

    pub fn autonomy_events(&self) -> &[AutonomyLogEntry] {
        &self.autonomy_events
    }

    /// Timestamp of the first interaction, which marks the session start.
    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.interactions.first().map(|e| e.timestamp)
    }
}

/// The downloadable session artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub student_name: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    pub session_end: DateTime<Utc>,
    pub interactions: Vec<InteractionLogEntry>,
    pub autonomy_events: Vec<AutonomyLogEntry>,
}

impl SessionExport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
