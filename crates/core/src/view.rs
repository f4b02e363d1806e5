//! Read-only projection of a session for rendering.
//!
//! Rendering is a pure function of [`SessionState`]: building a view any
//! number of times never logs, never mutates, and never re-fires the
//! scaffolding latch.

use crate::{
    corpus::{
        self, DEBATE_TOPICS, Dialogue, ROLE_PLAY_SCENARIOS, Register, Relationship, Scenario,
        ScenarioKind,
    },
    scaffolding::{self, ExamplePanel},
    session::{Activity, ConversationTurn, NoticingStep, PracticeStep, SessionState, Stage},
};
use serde::Serialize;

/// The Activity 1 summary screen: both registers side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub peer_examples: Vec<&'static str>,
    pub authority_examples: Vec<&'static str>,
    pub questions: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub student_name: Option<String>,
    pub activity: Option<Activity>,
    pub stage: Stage,
    pub state: &'static str,
    /// Scenarios the learner may pick from in the current stage.
    pub choices: Vec<&'static Scenario>,
    pub scenario: Option<&'static Scenario>,
    pub context_reminder: Option<String>,
    pub conversation: Vec<ConversationTurn>,
    pub turn_count: u32,
    pub pending_transcript: Option<String>,
    pub dialogue: Option<&'static Dialogue>,
    pub summary: Option<SummaryView>,
    /// The automatic scaffolding panel, while it is still the current one.
    pub scaffolding: Option<ExamplePanel>,
}

impl SessionView {
    pub fn render(state: &SessionState) -> Self {
        let stage = state.stage();
        let scenario = state.scenario();

        let choices: Vec<&'static Scenario> = match stage.practice() {
            Some((kind, PracticeStep::Menu | PracticeStep::Complete)) => match kind {
                ScenarioKind::Debate => DEBATE_TOPICS.iter().collect(),
                ScenarioKind::RolePlay => ROLE_PLAY_SCENARIOS.iter().collect(),
            },
            _ => Vec::new(),
        };

        let dialogue = match stage {
            Stage::Noticing(NoticingStep::FirstDialogue) => corpus::find_dialogue("mobile_phones"),
            Stage::Noticing(NoticingStep::SecondDialogue) => {
                corpus::find_dialogue("life_expectancy")
            }
            _ => None,
        };

        let summary = (stage == Stage::Noticing(NoticingStep::Summary)).then(|| SummaryView {
            peer_examples: corpus::examples(Register::LowPower, 4),
            authority_examples: corpus::examples(Register::HighPower, 4),
            questions: corpus::SUMMARY_QUESTIONS,
        });

        let scaffolding = scenario
            .filter(|_| stage.is_chat() && state.scaffolding_shown() && state.turn_count() == 1)
            .map(|s| scaffolding::automatic_panel(s.register));

        Self {
            student_name: state.student_name().map(str::to_string),
            activity: state.activity(),
            stage,
            state: state.state_tag(),
            choices,
            scenario,
            context_reminder: scenario.map(|s| context_reminder(s.relationship)),
            conversation: state.conversation().to_vec(),
            turn_count: state.turn_count(),
            pending_transcript: state.pending_transcript().map(str::to_string),
            dialogue,
            summary,
            scaffolding,
        }
    }
}

/// Reminder of who the learner is talking to.
pub fn context_reminder(relationship: Relationship) -> String {
    let tail = match relationship {
        Relationship::Friends => "casual and direct is fine!",
        Relationship::Classmates => "keep it casual and friendly!",
        Relationship::BossEmployee => "be professional and diplomatic!",
    };
    format!(
        "Remember: You're talking with your {} - {}",
        relationship.partner_label(),
        tail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogRole;

    fn named(stage: Stage) -> SessionState {
        let mut state = SessionState::new();
        state.student_name = Some("Ana".into());
        state.stage = stage;
        state
    }

    #[test]
    fn rendering_is_pure() {
        let mut state = named(Stage::Debate(PracticeStep::Menu));
        state.begin_scenario(corpus::find_scenario("homework").unwrap());
        state.stage = Stage::Debate(PracticeStep::Chat);
        state.turn_count = 1;
        state.scaffolding_shown = true;
        state.log_interaction(LogRole::Partner, "opening");
        let before = state.clone();

        let first = SessionView::render(&state);
        let second = SessionView::render(&state);

        assert_eq!(first, second);
        assert_eq!(state, before);
        assert!(first.scaffolding.is_some());
    }

    #[test]
    fn scaffolding_panel_disappears_after_next_turn() {
        let mut state = named(Stage::RolePlay(PracticeStep::Menu));
        state.begin_scenario(corpus::find_scenario("boss_schedule").unwrap());
        state.stage = Stage::RolePlay(PracticeStep::Chat);
        state.scaffolding_shown = true;
        state.turn_count = 2;

        assert!(SessionView::render(&state).scaffolding.is_none());

        state.turn_count = 1;
        let panel = SessionView::render(&state).scaffolding.unwrap();
        assert_eq!(panel.register, Register::HighPower);
    }

    #[test]
    fn unlatched_first_turn_shows_no_panel() {
        let mut state = named(Stage::Debate(PracticeStep::Menu));
        state.begin_scenario(corpus::find_scenario("homework").unwrap());
        state.stage = Stage::Debate(PracticeStep::Chat);
        state.turn_count = 1;

        assert!(SessionView::render(&state).scaffolding.is_none());
    }

    #[test]
    fn noticing_screens_carry_their_content() {
        let view = SessionView::render(&named(Stage::Noticing(NoticingStep::FirstDialogue)));
        assert_eq!(view.dialogue.map(|d| d.id), Some("mobile_phones"));
        assert!(view.summary.is_none());

        let view = SessionView::render(&named(Stage::Noticing(NoticingStep::Summary)));
        let summary = view.summary.unwrap();
        assert_eq!(summary.peer_examples.len(), 4);
        assert_eq!(summary.authority_examples.len(), 4);
        assert!(view.dialogue.is_none());
    }

    #[test]
    fn menus_list_their_activity_choices() {
        let debate = SessionView::render(&named(Stage::Debate(PracticeStep::Menu)));
        assert_eq!(debate.choices.len(), DEBATE_TOPICS.len());

        let role_play = SessionView::render(&named(Stage::RolePlay(PracticeStep::Complete)));
        assert_eq!(role_play.choices.len(), ROLE_PLAY_SCENARIOS.len());

        let chat = SessionView::render(&named(Stage::Welcome));
        assert!(chat.choices.is_empty());
    }

    #[test]
    fn unnamed_session_renders_name_entry() {
        let view = SessionView::render(&SessionState::new());
        assert_eq!(view.state, "name_entry");
        assert_eq!(SessionView::render(&named(Stage::Welcome)).state, "welcome");
    }

    #[test]
    fn context_reminder_matches_relationship() {
        assert_eq!(
            context_reminder(Relationship::Friends),
            "Remember: You're talking with your friend - casual and direct is fine!"
        );
        assert!(context_reminder(Relationship::BossEmployee).contains("boss - be professional"));
    }
}
