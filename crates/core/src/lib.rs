pub mod corpus;
pub mod engine;
pub mod llm_client;
pub mod log;
pub mod prompt;
pub mod scaffolding;
pub mod session;
pub mod transcription;
pub mod view;

use scaffolding::ExamplePanel;
use serde::Serialize;

/// Side effects the turn engine asks the host to surface to the learner.
///
/// The engine never renders anything itself; a host turns each notice into
/// whatever its view layer uses (a banner, a panel, a toast).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// A soft validation failure. Nothing changed.
    Warning { message: String },
    /// A collaborator failed and a fallback value was used.
    Error { message: String },
    /// Corpus examples to display, either on request or as scaffolding.
    Examples { panel: ExamplePanel },
    /// A voice recording was transcribed and is ready to send.
    Transcribed { text: String },
    /// The learner finished the last activity; the log can be downloaded.
    SessionComplete { message: String },
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Notice::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error {
            message: message.into(),
        }
    }
}
