//! Conversational assistant prompt.

use promptwire_core::context::{FragmentRole, PromptArgs, PromptBuilder, PromptFragment};
use promptwire_core::provider::PromptConfig;

/// Stop sequences that end an assistant turn.
pub const STOP_SEQUENCES: [&str; 2] = ["Human:", "AI:"];

const PREAMBLE: &str = "The following is a conversation with an AI assistant. \
The assistant is helpful, creative, clever, and very friendly.";

/// A `Human:`/`AI:` style prompt for a chat assistant.
///
/// System fragments extend the system instructions, context fragments are
/// listed under a "Use the following context" block, and history fragments
/// become prior turns ahead of the current query.
#[derive(Debug, Clone)]
pub struct AssistantPrompt {
    args: PromptArgs,
    system: Vec<String>,
    context: Vec<String>,
    history: Vec<String>,
    changed: bool,
}

impl AssistantPrompt {
    pub fn new(args: PromptArgs) -> Self {
        let system = if args.system.is_empty() {
            Vec::new()
        } else {
            vec![args.system.clone()]
        };
        Self {
            args,
            system,
            context: Vec::new(),
            history: Vec::new(),
            changed: true,
        }
    }

    /// Start with fixed context, ahead of anything merged later.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Stop sequences to send with the rendered prompt.
    pub fn prompt_config(&self) -> PromptConfig {
        PromptConfig::with_stop_sequences(STOP_SEQUENCES)
    }
}

impl PromptBuilder for AssistantPrompt {
    fn add_fragments(&mut self, fragments: Vec<PromptFragment>) {
        if fragments.is_empty() {
            return;
        }
        for fragment in fragments {
            match fragment.role {
                FragmentRole::System => self.system.push(fragment.text),
                FragmentRole::Context => self.context.push(fragment.text),
                FragmentRole::History => self.history.push(fragment.text),
            }
        }
        self.changed = true;
    }

    fn has_changed(&self) -> bool {
        self.changed
    }

    fn render(&mut self) -> String {
        self.changed = false;

        let context = if self.context.is_empty() {
            String::new()
        } else {
            format!("\nUse the following context:\n{}", self.context.join("\n"))
        };

        format!(
            "\n{system}\n{PREAMBLE}\n{context}\n\n{history}\nHuman: {query}\nAI:\n",
            system = self.system.join("\n"),
            history = self.history.join("\n"),
            query = self.args.query,
        )
    }
}
