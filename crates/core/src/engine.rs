//! Turn Engine
//!
//! The single transition function of a session: given the current
//! [`SessionState`] and one discrete learner [`Action`], compute the next
//! stage, update the conversation, call the partner model when a turn is
//! submitted, and append to the session logs.
//!
//! Every action is handled to completion before the next one is accepted.
//! Rejected actions (soft warnings and [`TransitionError`]s alike) leave the
//! state exactly as it was. Collaborator failures never escape: they are
//! turned into a [`Notice::Error`] and a fallback value so the conversation
//! can always move on.

use crate::{
    Notice,
    corpus::{self, ScenarioKind},
    llm_client::LLMClient,
    log::LogRole,
    prompt::PromptComposer,
    scaffolding::{self, Trigger},
    session::{ConversationTurn, InputMethod, NoticingStep, PracticeStep, SessionState, Stage},
    transcription::Transcriber,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Partner turn used when the model cannot be reached.
pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now. Please try again.";

const EMPTY_NAME_WARNING: &str = "Please enter your name to continue.";
const EMPTY_TURN_WARNING: &str = "Please record your voice or type a response first!";
const EMPTY_REFLECTION_WARNING: &str = "Please write your reflection before submitting.";
const NO_SPEECH_WARNING: &str = "No speech was recognised. Please try again or type your response.";

/// A discrete learner action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    StartSession {
        name: String,
    },
    /// Moves on to the next activity, optionally leaving a comment about the current one.
    ChooseActivity {
        #[serde(default)]
        notes: Option<String>,
    },
    /// Moves forward within the noticing activity.
    Continue {
        #[serde(default)]
        notes: Option<String>,
    },
    SelectScenario {
        id: String,
    },
    SubmitTurn {
        text: String,
        method: InputMethod,
    },
    RequestHelp,
    EndScenario,
    GoBack,
    SubmitReflection {
        text: String,
    },
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartSession { .. } => "start_session",
            Action::ChooseActivity { .. } => "choose_activity",
            Action::Continue { .. } => "continue",
            Action::SelectScenario { .. } => "select_scenario",
            Action::SubmitTurn { .. } => "submit_turn",
            Action::RequestHelp => "request_help",
            Action::EndScenario => "end_scenario",
            Action::GoBack => "go_back",
            Action::SubmitReflection { .. } => "submit_reflection",
            Action::Reset => "reset",
        }
    }
}

/// An action that makes no sense in the current stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("action '{action}' is not valid in stage '{stage}'")]
    InvalidAction {
        action: &'static str,
        stage: &'static str,
    },
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("scenario '{id}' cannot be selected in stage '{stage}'")]
    ScenarioNotAvailable { id: String, stage: &'static str },
    #[error("no scenario is selected in stage '{0}'")]
    NoActiveScenario(&'static str),
    #[error("scenario '{0}' must be completed before the reflection")]
    ScenarioRemaining(&'static str),
}

/// Result of a voice transcription request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcription {
    /// The transcript, empty when nothing usable came back.
    pub text: String,
    pub notices: Vec<Notice>,
}

/// Drives sessions forward. Holds only the collaborators, never session data.
pub struct TurnEngine {
    llm: Arc<dyn LLMClient>,
    transcriber: Arc<dyn Transcriber>,
    composer: PromptComposer,
}

impl TurnEngine {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        transcriber: Arc<dyn Transcriber>,
        composer: PromptComposer,
    ) -> Self {
        Self {
            llm,
            transcriber,
            composer,
        }
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Applies one learner action to `state`.
    #[instrument(name = "advance", skip_all, fields(stage = %state.stage(), action = action.name()))]
    pub async fn advance(
        &self,
        state: &mut SessionState,
        action: Action,
    ) -> Result<Vec<Notice>, TransitionError> {
        if state.student_name.is_none() {
            return match action {
                Action::StartSession { name } => Ok(start_session(state, &name)),
                Action::Reset => Ok(reset(state)),
                other => Err(invalid(&other, state)),
            };
        }

        match (state.stage, action) {
            (_, Action::Reset) => Ok(reset(state)),

            (Stage::Welcome, Action::ChooseActivity { .. }) => {
                state.stage = Stage::Noticing(NoticingStep::Intro);
                state.log_interaction(LogRole::System, "Started Activity 1");
                Ok(Vec::new())
            }
            (Stage::Noticing(NoticingStep::Intro), Action::Continue { .. }) => {
                state.stage = Stage::Noticing(NoticingStep::FirstDialogue);
                Ok(Vec::new())
            }
            (Stage::Noticing(NoticingStep::FirstDialogue), Action::Continue { notes }) => {
                log_notes(state, "Activity 1 - Dialogue 1 response", notes);
                state.stage = Stage::Noticing(NoticingStep::SecondDialogue);
                Ok(Vec::new())
            }
            (Stage::Noticing(NoticingStep::SecondDialogue), Action::Continue { notes }) => {
                log_notes(state, "Activity 1 - Dialogue 2 response", notes);
                state.stage = Stage::Noticing(NoticingStep::Summary);
                Ok(Vec::new())
            }
            (Stage::Noticing(NoticingStep::Summary), Action::ChooseActivity { notes }) => {
                log_notes(state, "Activity 1 reflection", notes);
                state.stage = Stage::Debate(PracticeStep::Menu);
                state.log_interaction(LogRole::System, "Completed Activity 1, Started Activity 2");
                Ok(Vec::new())
            }
            (Stage::Debate(PracticeStep::Complete), Action::ChooseActivity { .. }) => {
                state.clear_conversation();
                state.stage = Stage::RolePlay(PracticeStep::Menu);
                state.log_interaction(LogRole::System, "Completed Activity 2, Started Activity 3");
                Ok(Vec::new())
            }
            (Stage::RolePlay(PracticeStep::Complete), Action::ChooseActivity { .. }) => {
                if state.scenario().map(|s| s.id) != Some(corpus::FINAL_ROLE_PLAY) {
                    return Err(TransitionError::ScenarioRemaining(corpus::FINAL_ROLE_PLAY));
                }
                state.stage = Stage::Reflection;
                Ok(Vec::new())
            }

            (stage, Action::SelectScenario { id }) => match stage.practice() {
                Some((kind, PracticeStep::Menu | PracticeStep::Complete)) => {
                    select_scenario(state, kind, &id)
                }
                _ => Err(TransitionError::InvalidAction {
                    action: "select_scenario",
                    stage: stage.tag(),
                }),
            },
            (stage, Action::SubmitTurn { text, method }) if stage.is_chat() => {
                self.submit_turn(state, &text, method).await
            }
            (stage, Action::RequestHelp) if stage.is_chat() => request_help(state),
            (stage, Action::EndScenario) if stage.is_chat() => {
                if let Some((kind, _)) = stage.practice() {
                    state.stage = Stage::practice_stage(kind, PracticeStep::Complete);
                }
                Ok(Vec::new())
            }
            (stage, Action::GoBack) => match stage.practice() {
                Some((kind, PracticeStep::Chat | PracticeStep::Complete)) => {
                    state.clear_conversation();
                    state.stage = Stage::practice_stage(kind, PracticeStep::Menu);
                    Ok(Vec::new())
                }
                _ => Err(TransitionError::InvalidAction {
                    action: "go_back",
                    stage: stage.tag(),
                }),
            },

            (Stage::Reflection, Action::SubmitReflection { text }) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(vec![Notice::warning(EMPTY_REFLECTION_WARNING)]);
                }
                state.log_interaction(LogRole::Learner, format!("REFLECTION: {text}"));
                state.stage = Stage::Complete;
                info!(student = state.student_name().unwrap_or_default(), "Session complete");
                Ok(vec![Notice::SessionComplete {
                    message: "Thank you for participating!".to_string(),
                }])
            }

            (_, other) => Err(invalid(&other, state)),
        }
    }

    /// Transcribes a voice recording into the pending transcription buffer.
    ///
    /// Only valid while chatting. A failed call yields an empty transcript and
    /// an error notice; no turn is ever appended here.
    #[instrument(name = "transcribe", skip_all, fields(stage = %state.stage(), bytes = audio.len()))]
    pub async fn transcribe(
        &self,
        state: &mut SessionState,
        audio: Vec<u8>,
    ) -> Result<Transcription, TransitionError> {
        if state.student_name.is_none() || !state.stage.is_chat() {
            return Err(TransitionError::InvalidAction {
                action: "transcribe",
                stage: state.stage.tag(),
            });
        }

        match self.transcriber.transcribe(audio).await {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                state.pending_transcript = Some(text.clone());
                Ok(Transcription {
                    notices: vec![Notice::Transcribed { text: text.clone() }],
                    text,
                })
            }
            Ok(_) => Ok(Transcription {
                text: String::new(),
                notices: vec![Notice::warning(NO_SPEECH_WARNING)],
            }),
            Err(e) => {
                error!(error = ?e, "Transcription call failed");
                Ok(Transcription {
                    text: String::new(),
                    notices: vec![Notice::error(format!("Error transcribing audio: {e}"))],
                })
            }
        }
    }

    async fn submit_turn(
        &self,
        state: &mut SessionState,
        text: &str,
        method: InputMethod,
    ) -> Result<Vec<Notice>, TransitionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(vec![Notice::warning(EMPTY_TURN_WARNING)]);
        }
        let scenario = state
            .scenario()
            .ok_or(TransitionError::NoActiveScenario(state.stage.tag()))?;

        state.log_interaction(
            LogRole::Learner,
            format!("[{method}] Turn {}: {text}", state.turn_count + 1),
        );

        let messages = self.composer.compose(scenario, &state.conversation, text);
        let mut notices = Vec::new();
        let reply = match self.llm.complete(messages).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                warn!(scenario = scenario.id, "Partner model returned an empty reply");
                notices.push(Notice::error("The partner model returned an empty reply."));
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                error!(scenario = scenario.id, error = ?e, "Partner model call failed");
                notices.push(Notice::error(format!("Error calling the partner model: {e}")));
                FALLBACK_REPLY.to_string()
            }
        };

        state.conversation.push(ConversationTurn::learner(text));
        state.conversation.push(ConversationTurn::partner(reply.clone()));
        state.log_interaction(LogRole::Partner, reply);
        state.turn_count += 1;
        state.pending_transcript = None;

        if scaffolding::should_auto_scaffold(state.turn_count, state.scaffolding_shown) {
            state.scaffolding_shown = true;
            state.log_autonomy(Trigger::Automatic.autonomy_action());
            notices.push(Notice::Examples {
                panel: scaffolding::automatic_panel(scenario.register),
            });
        }

        info!(
            scenario = scenario.id,
            turn_count = state.turn_count,
            %method,
            "Turn completed"
        );
        Ok(notices)
    }
}

fn invalid(action: &Action, state: &SessionState) -> TransitionError {
    TransitionError::InvalidAction {
        action: action.name(),
        stage: state.state_tag(),
    }
}

fn start_session(state: &mut SessionState, name: &str) -> Vec<Notice> {
    let name = name.trim();
    if name.is_empty() {
        return vec![Notice::warning(EMPTY_NAME_WARNING)];
    }
    state.student_name = Some(name.to_string());
    state.stage = Stage::Welcome;
    info!(student = name, "Session started");
    Vec::new()
}

fn reset(state: &mut SessionState) -> Vec<Notice> {
    info!(student = state.student_name().unwrap_or_default(), "Session reset");
    state.reset();
    Vec::new()
}

fn log_notes(state: &mut SessionState, label: &str, notes: Option<String>) {
    if let Some(notes) = notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        state.log_interaction(LogRole::Learner, format!("{label}: {notes}"));
    }
}

fn select_scenario(
    state: &mut SessionState,
    kind: ScenarioKind,
    id: &str,
) -> Result<Vec<Notice>, TransitionError> {
    let scenario =
        corpus::find_scenario(id).ok_or_else(|| TransitionError::UnknownScenario(id.to_string()))?;
    if scenario.kind != kind {
        return Err(TransitionError::ScenarioNotAvailable {
            id: id.to_string(),
            stage: state.stage.tag(),
        });
    }

    state.begin_scenario(scenario);
    state.stage = Stage::practice_stage(kind, PracticeStep::Chat);
    state.log_interaction(LogRole::Partner, scenario.opening_line);
    info!(scenario = scenario.id, relationship = %scenario.relationship, "Scenario selected");
    Ok(Vec::new())
}

fn request_help(state: &mut SessionState) -> Result<Vec<Notice>, TransitionError> {
    let scenario = state
        .scenario()
        .ok_or(TransitionError::NoActiveScenario(state.stage.tag()))?;
    state.log_autonomy(Trigger::OnDemand.autonomy_action());
    info!(scenario = scenario.id, "Examples requested");
    Ok(vec![Notice::Examples {
        panel: scaffolding::help_panel(scenario.register),
    }])
}
