//! Prompt Composer
//!
//! Builds the ordered message list for one partner turn: the persona
//! instructions, a relationship-specific context instruction, the prior
//! conversation in its original order, and finally the learner's new
//! utterance.
//!
//! Target structures are modelled, never taught. Every relationship branch
//! carries phrase templates for the partner to *use* and an instruction to
//! react in character to a register mismatch, together with an explicit ban
//! on naming or correcting the learner's language.

use crate::{
    corpus::{Relationship, RelationshipKind, Scenario},
    llm_client::PromptMessage,
    session::{ConversationTurn, TurnRole},
};

/// Persona instructions sent as the first system message of every request.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are "Discussion Partner," a conversation partner who helps learners discover how to disagree politely in English using real conversations from the Trinity Lancaster Corpus (TLC).

CORE PRINCIPLES:

1. Use ONLY language patterns from the provided TLC corpus data
2. ALWAYS model target structures in your responses
3. NEVER give explicit metalinguistic feedback, grammar rules, or tell the learner what to say
4. NEVER say things like "You should use...", "Try saying...", "You might say..."
5. Respond contingently to the learner's ideas and content
6. React naturally if their register is inappropriate (too rude, too formal)

TARGET STRUCTURES (from TLC) - USE THESE IN YOUR RESPONSES:

HIGH POWER (Boss/Teacher):
- "I understand/see/can see your point, but..."
- "I appreciate that, however..."
- "That's a valid concern, but perhaps..."
- Add mitigation: "maybe", "perhaps", "I think", "I feel"

LOW POWER (Friends/Siblings):
- "Yeah but..."
- "I agree but..."
- "True, but..."
- Add mitigation: "maybe", "I think"

MODEL the language, don't TEACH it. You are a CONVERSATION PARTNER, not a grammar teacher. The learner learns by seeing you use the patterns repeatedly in authentic conversation."#;

const PEER_CONTEXT: &str = r#"TARGET STRUCTURES YOU MUST USE IN YOUR RESPONSES:
- Start with: "Yeah but...", "I agree but...", "True, but...", "I see that, but..."
- Keep it short and casual (2-3 sentences)
- Add maybe/I think if appropriate
- Example: "Yeah but don't you think you need money to be happy? I mean, you gotta pay for stuff, right?"

REACT TO INAPPROPRIATE REGISTER:
If they're too formal (e.g., "I respectfully disagree", elaborate language):
- React: "Whoa, you sound so formal! We're just friends talking."
- Continue naturally modeling casual patterns
- NEVER say "You should use..." or "Try saying..."

If they're appropriate:
- Just continue naturally using casual patterns"#;

const AUTHORITY_CONTEXT: &str = r#"TARGET STRUCTURES YOU MUST USE IN YOUR RESPONSES:
- Start with: "I understand..., however...", "I can see your point, but perhaps...", "I appreciate that, though..."
- Be diplomatic and elaborate (3-4 sentences)
- Add: "perhaps", "maybe", "I think"
- Example: "I understand you have scheduling constraints. However, we need to find a solution that works for the business. Perhaps we could discuss alternative arrangements?"

REACT TO INAPPROPRIATE REGISTER:
If they're too casual/rude (e.g., "nah", "no", very short/blunt):
- React professionally: "That's quite direct for a professional conversation."
- Continue naturally modeling formal patterns
- NEVER say "You should say..." or "Try using..."

If they're appropriate:
- Just continue naturally using formal patterns"#;

const TURN_INSTRUCTIONS: &str = r#"CRITICAL INSTRUCTIONS:

1. ALWAYS use the appropriate target structures in YOUR responses
2. React naturally if their register doesn't match the relationship
3. Engage with their actual content and ideas
4. Ask follow-up questions
5. Model the language through your responses - never name, explain or correct the learner's grammar

NOW RESPOND TO WHAT THEY JUST SAID, using the appropriate target structures."#;

/// Assembles LLM payloads for the simulated partner.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    system_prompt: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl PromptComposer {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Context instruction for one relationship and topic.
    pub fn context_instruction(&self, relationship: Relationship, topic: &str) -> String {
        let (setting, patterns) = match relationship.kind() {
            RelationshipKind::Peer => (
                format!(
                    "You are having a casual conversation with your {}.",
                    relationship.partner_label()
                ),
                PEER_CONTEXT,
            ),
            RelationshipKind::Authority => (
                "You are the learner's BOSS in a professional setting.".to_string(),
                AUTHORITY_CONTEXT,
            ),
        };
        format!("{setting}\n\n{patterns}\n\nCURRENT TOPIC: {topic}\n\n{TURN_INSTRUCTIONS}")
    }

    /// Builds the complete request for the learner's `utterance`.
    ///
    /// `history` is the conversation *before* the new utterance and is sent
    /// in its original order.
    pub fn compose(
        &self,
        scenario: &Scenario,
        history: &[ConversationTurn],
        utterance: &str,
    ) -> Vec<PromptMessage> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(PromptMessage::system(self.system_prompt.clone()));
        messages.push(PromptMessage::system(
            self.context_instruction(scenario.relationship, scenario.topic),
        ));
        messages.extend(history.iter().map(|turn| match turn.role {
            TurnRole::Learner => PromptMessage::user(turn.text.clone()),
            TurnRole::Partner => PromptMessage::assistant(turn.text.clone()),
        }));
        messages.push(PromptMessage::user(utterance));
        messages
    }
}
