//! # Personas and Prompt Assembly
//!
//! A persona is a fixed system prompt plus the kind of context that fills its
//! `{context}` slot and the sampling parameters used for every generation.

use crate::{
    constants::CONTEXT_PLACEHOLDER,
    prompts::personas::{
        B_SHEN_BASIC_SYSTEM_PROMPT, B_SHEN_SYSTEM_PROMPT, DAN_SYSTEM_PROMPT, WJD_SYSTEM_PROMPT,
    },
    sample::HistoricalSample,
    types::GenerationParams,
};
use serde::{Deserialize, Serialize};

/// Where a persona's prompt context comes from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersonaContext {
    /// The template is used as-is.
    None,
    /// A historical sample file, `<stem>.txt` or `<stem>.json` in the data directory.
    Sample { stem: String },
    /// Passages retrieved from the vector index for the latest user message.
    Retrieval,
}

/// A fully resolved chat persona.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Persona {
    pub name: String,
    pub system_prompt: String,
    pub context: PersonaContext,
    pub params: GenerationParams,
}

/// The context resolved for one request, ready to be inserted into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptContext {
    Passages(Vec<String>),
    Sample(HistoricalSample),
    Empty,
}

/// Inserts the request context into the template's `{context}` slot.
///
/// Passages are joined with newlines. A template without the slot gets the
/// context appended after a blank line, so context is never silently lost.
pub fn assemble_prompt(template: &str, context: &PromptContext) -> String {
    let insertion = match context {
        PromptContext::Passages(passages) => passages.join("\n"),
        PromptContext::Sample(sample) => sample.render().to_string(),
        PromptContext::Empty => String::new(),
    };

    if template.contains(CONTEXT_PLACEHOLDER) {
        template.replace(CONTEXT_PLACEHOLDER, &insertion)
    } else if insertion.is_empty() {
        template.to_string()
    } else {
        format!("{template}\n\n{insertion}")
    }
}

/// The personas served out of the box, keyed by their endpoint name.
pub fn default_personas() -> Vec<Persona> {
    vec![
        Persona {
            name: "chat".to_string(),
            system_prompt: B_SHEN_BASIC_SYSTEM_PROMPT.to_string(),
            context: PersonaContext::Sample {
                stem: "1".to_string(),
            },
            params: GenerationParams {
                temperature: 1.5,
                max_tokens: 200,
                frequency_penalty: None,
                presence_penalty: None,
            },
        },
        Persona {
            name: "chat-b".to_string(),
            system_prompt: B_SHEN_SYSTEM_PROMPT.to_string(),
            context: PersonaContext::Sample {
                stem: "1".to_string(),
            },
            params: GenerationParams {
                temperature: 1.3,
                max_tokens: 200,
                frequency_penalty: Some(1.0),
                presence_penalty: None,
            },
        },
        Persona {
            name: "chat-wjd".to_string(),
            system_prompt: WJD_SYSTEM_PROMPT.to_string(),
            context: PersonaContext::Sample {
                stem: "wjd".to_string(),
            },
            params: GenerationParams {
                temperature: 1.2,
                max_tokens: 150,
                frequency_penalty: Some(1.0),
                presence_penalty: None,
            },
        },
        Persona {
            name: "chat-dan".to_string(),
            system_prompt: DAN_SYSTEM_PROMPT.to_string(),
            context: PersonaContext::Retrieval,
            params: GenerationParams {
                temperature: 1.2,
                max_tokens: 200,
                frequency_penalty: Some(1.2),
                presence_penalty: Some(0.8),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAMPLE_PLACEHOLDER;

    #[test]
    fn test_passages_are_joined_into_slot() {
        let prompt = assemble_prompt(
            "before\n{context}\nafter",
            &PromptContext::Passages(vec!["one".into(), "two".into()]),
        );
        assert_eq!(prompt, "before\none\ntwo\nafter");
    }

    #[test]
    fn test_empty_passages_leave_empty_slot_and_are_idempotent() {
        let template = "rules:\n{context}";
        let context = PromptContext::Passages(vec![]);
        let first = assemble_prompt(template, &context);
        let second = assemble_prompt(template, &context);
        assert_eq!(first, "rules:\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_sample_renders_placeholder() {
        let prompt = assemble_prompt(
            "样本：{context}",
            &PromptContext::Sample(HistoricalSample::Absent),
        );
        assert_eq!(prompt, format!("样本：{SAMPLE_PLACEHOLDER}"));
    }

    #[test]
    fn test_template_without_slot_appends_context() {
        let prompt = assemble_prompt(
            "plain",
            &PromptContext::Sample(HistoricalSample::Present("x".into())),
        );
        assert_eq!(prompt, "plain\n\nx");
        assert_eq!(assemble_prompt("plain", &PromptContext::Empty), "plain");
    }

    #[test]
    fn test_default_personas_have_context_slots() {
        let personas = default_personas();
        assert_eq!(personas.len(), 4);
        for persona in &personas {
            assert!(
                persona.system_prompt.contains(CONTEXT_PLACEHOLDER),
                "persona '{}' has no context slot",
                persona.name
            );
        }
        let dan = personas.iter().find(|p| p.name == "chat-dan").unwrap();
        assert_eq!(dan.context, PersonaContext::Retrieval);
    }
}
