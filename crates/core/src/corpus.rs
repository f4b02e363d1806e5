//! Static Content Store
//!
//! Example dialogues, register-tagged corpus utterances, debate topics and
//! role-play scenarios. Everything here is immutable reference data; the
//! session only ever stores scenario ids and looks the records up again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The formality/directness level a relationship calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Register {
    HighPower,
    LowPower,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::HighPower => write!(f, "high_power"),
            Register::LowPower => write!(f, "low_power"),
        }
    }
}

/// Power distance between the learner and the simulated partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    High,
    Low,
}

/// Whether the partner is an equal or someone with authority over the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Peer,
    Authority,
}

/// Flavour label for the relationship. Only the [`RelationshipKind`] changes behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    Friends,
    Classmates,
    BossEmployee,
}

impl Relationship {
    pub fn kind(self) -> RelationshipKind {
        match self {
            Relationship::Friends | Relationship::Classmates => RelationshipKind::Peer,
            Relationship::BossEmployee => RelationshipKind::Authority,
        }
    }

    /// Corpus register matching this relationship. Authority pairs with
    /// `high_power`, peers with `low_power`.
    pub fn register(self) -> Register {
        match self.kind() {
            RelationshipKind::Authority => Register::HighPower,
            RelationshipKind::Peer => Register::LowPower,
        }
    }

    /// Who the partner is, as the learner would say it.
    pub fn partner_label(self) -> &'static str {
        match self {
            Relationship::Friends => "friend",
            Relationship::Classmates => "classmate",
            Relationship::BossEmployee => "boss",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Friends => write!(f, "friends"),
            Relationship::Classmates => write!(f, "classmates"),
            Relationship::BossEmployee => write!(f, "boss-employee"),
        }
    }
}

/// Which practice activity a scenario belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Debate,
    RolePlay,
}

/// A debate topic or role-play scenario. Both run through the same chat loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub kind: ScenarioKind,
    pub title: &'static str,
    /// Label passed to the partner as the current topic.
    pub topic: &'static str,
    pub power: Power,
    pub relationship: Relationship,
    /// The partner's stance (debates) or the situation description (role-plays).
    pub premise: &'static str,
    /// What the learner is asked to play, if anything beyond "yourself".
    pub learner_role: Option<&'static str>,
    pub opening_line: &'static str,
    pub register: Register,
}

/// One line of an annotated example dialogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueLine {
    pub speaker: &'static str,
    pub text: &'static str,
}

/// An example dialogue read during the noticing activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dialogue {
    pub id: &'static str,
    pub title: &'static str,
    pub context: &'static str,
    pub power: Power,
    pub lines: &'static [DialogueLine],
    pub questions: &'static [&'static str],
}

const HIGH_POWER_EXAMPLES: &[&str] = &[
    "I can see their point. It is sometimes annoying. But I don't agree that they should be banned.",
    "I can understand your opinion erm but I was still wondering...",
    "I agree with this point but don't you think maybe the fact that times are changing is a good thing?",
    "I understand his situation but I'm not sure if I should do it",
];

const LOW_POWER_EXAMPLES: &[&str] = &[
    "Yeah but there are some disadvantages like er...",
    "yeah I agree but I still the problem is that...",
    "Well I agree but maybe we can develop more jobs",
    "Yes but if people are going to live over a hundred and they're probably going to retire later...",
];

/// Returns up to `limit` corpus utterances for one register, in corpus order.
///
/// Registers are never mixed: the result only ever contains utterances
/// tagged with `register`.
pub fn examples(register: Register, limit: usize) -> Vec<&'static str> {
    let pool = match register {
        Register::HighPower => HIGH_POWER_EXAMPLES,
        Register::LowPower => LOW_POWER_EXAMPLES,
    };
    pool.iter().take(limit).copied().collect()
}

pub static DIALOGUES: &[Dialogue] = &[
    Dialogue {
        id: "mobile_phones",
        title: "Mobile Phones on Trains",
        context: "Eden (boss) and Tiara (employee) are talking",
        power: Power::High,
        lines: &[
            DialogueLine {
                speaker: "Eden",
                text: "Do you think that mobile phones should be banned on trains? Should they be forbidden?",
            },
            DialogueLine {
                speaker: "Tiara",
                text: "Because people speak too loudly?",
            },
            DialogueLine {
                speaker: "Eden",
                text: "Yes. Some people find that very annoying.",
            },
            DialogueLine {
                speaker: "Tiara",
                text: "I can see their point. It is sometimes annoying. But I don't agree that they should be banned.",
            },
        ],
        questions: &[
            "Does Tiara agree or disagree with Eden?",
            "What words does Tiara use to disagree?",
            "Is Tiara polite or rude?",
        ],
    },
    Dialogue {
        id: "life_expectancy",
        title: "Life Expectancy",
        context: "Linda and Semih are friends discussing how long people will live",
        power: Power::Low,
        lines: &[
            DialogueLine {
                speaker: "Linda",
                text: "Scientists say people will live over 100 years. I'm not convinced this is good.",
            },
            DialogueLine {
                speaker: "Semih",
                text: "Why aren't you keen on people living over 100?",
            },
            DialogueLine {
                speaker: "Linda",
                text: "When you look at 100-year-old people, they're not in excellent physical condition.",
            },
            DialogueLine {
                speaker: "Semih",
                text: "Well I agree but medicines and scientific research has been progressing. Maybe there are some kind of medicines in the future which can help.",
            },
            DialogueLine {
                speaker: "Linda",
                text: "Yes but if people live over 100 and retire later, then young people can't find jobs because older people keep working.",
            },
            DialogueLine {
                speaker: "Semih",
                text: "Well I agree but maybe we can develop more jobs...",
            },
        ],
        questions: &[
            "Do Linda and Semih agree or disagree?",
            "What words do they use to disagree?",
            "How is this conversation different from the first one?",
        ],
    },
];

/// Comparison questions shown with the Activity 1 summary examples.
pub static SUMMARY_QUESTIONS: &[&str] = &[
    "What do you notice that's the same in all these examples?",
    "What do you notice that's different between friends vs. boss/employee?",
    "Which examples are longer? Which are shorter?",
    "When would you use each style?",
];

pub static DEBATE_TOPICS: &[Scenario] = &[
    Scenario {
        id: "social_media",
        kind: ScenarioKind::Debate,
        title: "Social Media",
        topic: "Social Media",
        power: Power::Low,
        relationship: Relationship::Friends,
        premise: "Social media is helpful",
        learner_role: None,
        opening_line: "Hey! So you think social media is harmful? Yeah, I know it can cause some problems, but I think it really helps people stay connected with friends and family.",
        register: Register::LowPower,
    },
    Scenario {
        id: "homework",
        kind: ScenarioKind::Debate,
        title: "Homework",
        topic: "Homework",
        power: Power::Low,
        relationship: Relationship::Classmates,
        premise: "Homework is necessary",
        learner_role: None,
        opening_line: "Alright, homework debate! I agree it can be boring, but I think it's really important for learning. Don't you think practice helps?",
        register: Register::LowPower,
    },
    Scenario {
        id: "dress_code",
        kind: ScenarioKind::Debate,
        title: "Workplace Dress Code",
        topic: "Workplace Dress Code",
        power: Power::High,
        relationship: Relationship::BossEmployee,
        premise: "Professional dress code is necessary",
        learner_role: None,
        opening_line: "I understand you have concerns about the dress code policy. However, I believe maintaining professional attire is important for our company image and client relationships. Could you share your perspective on this?",
        register: Register::HighPower,
    },
    Scenario {
        id: "remote_work",
        kind: ScenarioKind::Debate,
        title: "Remote Work Policy",
        topic: "Remote Work Policy",
        power: Power::High,
        relationship: Relationship::BossEmployee,
        premise: "Office presence is important",
        learner_role: None,
        opening_line: "I can see why remote work appeals to many employees. However, I'm concerned about team collaboration and company culture. Perhaps we could discuss a balanced approach that addresses both needs?",
        register: Register::HighPower,
    },
];

/// The role-play whose completion closes Activity 3.
pub const FINAL_ROLE_PLAY: &str = "boss_schedule";

pub static ROLE_PLAY_SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "friend_phone",
        kind: ScenarioKind::RolePlay,
        title: "Scenario 1: Disagreeing with a friend",
        topic: "phone usage and health",
        power: Power::Low,
        relationship: Relationship::Friends,
        premise: "Your friend thinks using a phone all day is okay. You think it's bad for health.",
        learner_role: Some("You are talking to your friend"),
        opening_line: "I don't think using my phone all day is bad. It's fun! I can play games and talk to my friends all the time.",
        register: Register::LowPower,
    },
    Scenario {
        id: "boss_schedule",
        kind: ScenarioKind::RolePlay,
        title: "Scenario 2: Negotiating with your boss",
        topic: "late shift schedule vs school",
        power: Power::High,
        relationship: Relationship::BossEmployee,
        premise: "Your boss says everyone must work late shifts. You have school in the morning and can't stay late.",
        learner_role: Some("You are an employee"),
        opening_line: "I've reviewed the schedules, and I've decided that all employees need to work late shifts from now on. It's better for business, and I expect everyone to cooperate. This starts next week.",
        register: Register::HighPower,
    },
];

/// Looks up a debate topic or role-play scenario by id.
pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    DEBATE_TOPICS
        .iter()
        .chain(ROLE_PLAY_SCENARIOS.iter())
        .find(|s| s.id == id)
}

/// Looks up an example dialogue by id.
pub fn find_dialogue(id: &str) -> Option<&'static Dialogue> {
    DIALOGUES.iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_never_mix_registers() {
        let high = examples(Register::HighPower, 4);
        let low = examples(Register::LowPower, 4);

        assert_eq!(high.len(), 4);
        assert_eq!(low.len(), 4);
        assert!(high.iter().all(|e| HIGH_POWER_EXAMPLES.contains(e)));
        assert!(low.iter().all(|e| LOW_POWER_EXAMPLES.contains(e)));
        assert!(high.iter().all(|e| !low.contains(e)));
    }

    #[test]
    fn final_role_play_is_the_last_scenario() {
        let last = ROLE_PLAY_SCENARIOS.last().unwrap();
        assert_eq!(last.id, FINAL_ROLE_PLAY);
        assert_eq!(find_scenario(FINAL_ROLE_PLAY).unwrap().kind, ScenarioKind::RolePlay);
    }

    #[test]
    fn examples_respect_limit() {
        assert_eq!(examples(Register::LowPower, 3).len(), 3);
        assert_eq!(examples(Register::LowPower, 10).len(), 4);
        assert!(examples(Register::HighPower, 0).is_empty());
    }

    #[test]
    fn scenario_register_follows_relationship() {
        for scenario in DEBATE_TOPICS.iter().chain(ROLE_PLAY_SCENARIOS.iter()) {
            assert_eq!(
                scenario.register,
                scenario.relationship.register(),
                "register mismatch for {}",
                scenario.id
            );
            let expected_power = match scenario.relationship.kind() {
                RelationshipKind::Authority => Power::High,
                RelationshipKind::Peer => Power::Low,
            };
            assert_eq!(scenario.power, expected_power);
        }
    }

    #[test]
    fn find_scenario_covers_both_tables() {
        assert_eq!(
            find_scenario("homework").map(|s| s.kind),
            Some(ScenarioKind::Debate)
        );
        assert_eq!(
            find_scenario("boss_schedule").map(|s| s.kind),
            Some(ScenarioKind::RolePlay)
        );
        assert!(find_scenario("karaoke").is_none());
    }

    #[test]
    fn scenario_ids_are_unique() {
        let mut ids: Vec<_> = DEBATE_TOPICS
            .iter()
            .chain(ROLE_PLAY_SCENARIOS.iter())
            .map(|s| s.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEBATE_TOPICS.len() + ROLE_PLAY_SCENARIOS.len());
    }

    #[test]
    fn relationship_serializes_with_original_labels() {
        assert_eq!(
            serde_json::to_string(&Relationship::BossEmployee).unwrap(),
            "\"boss-employee\""
        );
        assert_eq!(
            serde_json::to_string(&Register::LowPower).unwrap(),
            "\"low_power\""
        );
        assert_eq!(Relationship::Classmates.to_string(), "classmates");
    }
}
