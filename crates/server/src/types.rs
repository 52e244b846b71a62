use personachat::{Persona, PersonaContext};
use serde::{Deserialize, Serialize};

/// A persona as listed by `GET /api/personas`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonaSummary {
    pub name: String,
    pub context: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&Persona> for PersonaSummary {
    fn from(persona: &Persona) -> Self {
        let context = match &persona.context {
            PersonaContext::None => "none",
            PersonaContext::Sample { .. } => "sample",
            PersonaContext::Retrieval => "retrieval",
        };
        Self {
            name: persona.name.clone(),
            context: context.to_string(),
            temperature: persona.params.temperature,
            max_tokens: persona.params.max_tokens,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PersonaListResponse {
    pub personas: Vec<PersonaSummary>,
}
