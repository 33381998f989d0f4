use crate::error::ConfigurationError;

pub(crate) const CONTEXT_PLACEHOLDER: &str = "{context}";
pub(crate) const QUESTION_PLACEHOLDER: &str = "{question}";

pub(crate) const DEFAULT_TEMPLATE: &str = "
Answer the question below.

Here is the conversation history: {context}

Question: {question}

Answer:
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Context,
    Question,
}

impl Slot {
    fn placeholder(self) -> &'static str {
        match self {
            Slot::Context => CONTEXT_PLACEHOLDER,
            Slot::Question => QUESTION_PLACEHOLDER,
        }
    }
}

/// A prompt template split around its two placeholders.
///
/// The template is validated once, so [`PromptTemplate::compose`] cannot fail.
#[derive(Debug, Clone)]
pub(crate) struct PromptTemplate {
    head: String,
    first: Slot,
    middle: String,
    second: Slot,
    tail: String,
}

impl PromptTemplate {
    /// Parses `template`, which must hold exactly one `{context}` and one
    /// `{question}`.
    pub(crate) fn new(template: &str) -> Result<Self, ConfigurationError> {
        let context_at = locate(template, CONTEXT_PLACEHOLDER)?;
        let question_at = locate(template, QUESTION_PLACEHOLDER)?;

        let ((first, first_at), (second, second_at)) = if context_at < question_at {
            ((Slot::Context, context_at), (Slot::Question, question_at))
        } else {
            ((Slot::Question, question_at), (Slot::Context, context_at))
        };

        Ok(Self {
            head: template[..first_at].to_string(),
            first,
            middle: template[first_at + first.placeholder().len()..second_at].to_string(),
            second,
            tail: template[second_at + second.placeholder().len()..].to_string(),
        })
    }

    /// Substitutes `context` and `question` literally into the template.
    pub(crate) fn compose(&self, context: &str, question: &str) -> String {
        let value = |slot: Slot| match slot {
            Slot::Context => context,
            Slot::Question => question,
        };
        let mut prompt = String::with_capacity(
            self.head.len() + self.middle.len() + self.tail.len() + context.len() + question.len(),
        );
        prompt.push_str(&self.head);
        prompt.push_str(value(self.first));
        prompt.push_str(&self.middle);
        prompt.push_str(value(self.second));
        prompt.push_str(&self.tail);
        prompt
    }
}

fn locate(template: &str, placeholder: &'static str) -> Result<usize, ConfigurationError> {
    let mut found = template.match_indices(placeholder).map(|(at, _)| at);
    let at = found
        .next()
        .ok_or(ConfigurationError::MissingPlaceholder(placeholder))?;
    if found.next().is_some() {
        return Err(ConfigurationError::DuplicatePlaceholder(placeholder));
    }
    Ok(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "Context: {context}\nQuestion: {question}\nAnswer:";

    #[test]
    fn compose_empty_context() {
        let template = PromptTemplate::new(SIMPLE).unwrap();
        assert_eq!(
            template.compose("", "What is 2+2?"),
            "Context: \nQuestion: What is 2+2?\nAnswer:"
        );
    }

    #[test]
    fn compose_default_template() {
        let template = PromptTemplate::new(DEFAULT_TEMPLATE).unwrap();
        let prompt = template.compose("User: hi\nAI: hello", "How are you?");
        assert_eq!(
            prompt,
            "\nAnswer the question below.\n\n\
             Here is the conversation history: User: hi\nAI: hello\n\n\
             Question: How are you?\n\nAnswer:\n"
        );
    }

    #[test]
    fn compose_question_before_context() {
        let template = PromptTemplate::new("Q={question};C={context}").unwrap();
        assert_eq!(template.compose("ctx", "q"), "Q=q;C=ctx");
    }

    #[test]
    fn compose_is_literal() {
        let template = PromptTemplate::new(SIMPLE).unwrap();
        let context = "see {question} and {context} \\n {}";
        let question = "{context}?";
        let prompt = template.compose(context, question);
        assert_eq!(
            prompt,
            format!("Context: {context}\nQuestion: {question}\nAnswer:")
        );
    }

    #[test]
    fn compose_length() {
        let template = PromptTemplate::new(SIMPLE).unwrap();
        let (context, question) = ("User: ünïcode\nAI: ok", "why?");
        let prompt = template.compose(context, question);
        assert_eq!(
            prompt.len(),
            SIMPLE.len() + context.len() + question.len()
                - CONTEXT_PLACEHOLDER.len()
                - QUESTION_PLACEHOLDER.len()
        );
    }

    #[test]
    fn compose_empty_inputs_leave_no_placeholder() {
        let template = PromptTemplate::new(DEFAULT_TEMPLATE).unwrap();
        let prompt = template.compose("", "");
        assert!(!prompt.contains(CONTEXT_PLACEHOLDER));
        assert!(!prompt.contains(QUESTION_PLACEHOLDER));
        assert!(prompt.contains("Here is the conversation history: \n"));
    }

    #[test]
    fn compose_is_deterministic() {
        let template = PromptTemplate::new(SIMPLE).unwrap();
        assert_eq!(
            template.compose("a", "b"),
            template.compose("a", "b")
        );
    }

    #[test]
    fn missing_placeholder() {
        let err = PromptTemplate::new("Question: {question}").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingPlaceholder(CONTEXT_PLACEHOLDER)
        ));
        let err = PromptTemplate::new("History: {context}").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingPlaceholder(QUESTION_PLACEHOLDER)
        ));
    }

    #[test]
    fn duplicate_placeholder() {
        let err = PromptTemplate::new("{context} {question} {context}").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DuplicatePlaceholder(CONTEXT_PLACEHOLDER)
        ));
    }
}
