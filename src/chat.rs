use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::GenerationError, generate::Generate, prompt::PromptTemplate};

/// Body of `POST /api/chat`. Absent or `null` fields read as empty strings.
///
/// Only a JSON object is accepted.
#[derive(Debug, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub(crate) struct ChatRequest {
    context: Option<String>,
    question: Option<String>,
}

#[derive(Deserialize)]
struct ChatFields {
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    question: Option<String>,
}

impl TryFrom<Map<String, Value>> for ChatRequest {
    type Error = serde_json::Error;

    fn try_from(body: Map<String, Value>) -> Result<Self, Self::Error> {
        let ChatFields { context, question } = serde_json::from_value(Value::Object(body))?;
        Ok(Self { context, question })
    }
}

impl ChatRequest {
    pub(crate) fn context(&self) -> &str {
        self.context.as_deref().unwrap_or_default()
    }

    pub(crate) fn question(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) answer: String,
}

/// Answers a question in the light of caller-supplied conversation context.
///
/// Holds no per-conversation state; the caller owns the context string and
/// grows it between turns.
pub(crate) struct AnswerService {
    template: PromptTemplate,
    generator: Arc<dyn Generate>,
}

impl AnswerService {
    pub(crate) fn new(template: PromptTemplate, generator: Arc<dyn Generate>) -> Self {
        Self {
            template,
            generator,
        }
    }

    /// Composes the prompt and makes exactly one call to the backend.
    pub(crate) async fn answer(
        &self,
        context: &str,
        question: &str,
    ) -> Result<String, GenerationError> {
        let prompt = self.template.compose(context, question);
        self.generator.generate(&prompt).await
    }
}
