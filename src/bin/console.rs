#[allow(dead_code)]
#[path = "../chat.rs"]
mod chat;
#[allow(dead_code)]
#[path = "../error.rs"]
mod error;
#[allow(dead_code)]
#[path = "../generate.rs"]
mod generate;
#[allow(dead_code)]
#[path = "../prompt.rs"]
mod prompt;
#[allow(dead_code)]
#[path = "../settings.rs"]
mod settings;

use std::{io::Write, sync::Arc};

use anyhow::{Context, Result};
use chat::AnswerService;
use clap::Parser;
use generate::OllamaGenerator;
use prompt::PromptTemplate;
use settings::{Args, Settings};

/// Conversation history kept the way the chat page keeps it: one
/// `User: ..` or `AI: ..` line per turn.
#[derive(Debug, Default)]
struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    fn push_user(&mut self, question: &str) {
        self.lines.push(format!("User: {question}"));
    }

    fn push_ai(&mut self, answer: &str) {
        self.lines.push(format!("AI: {answer}"));
    }

    fn context(&self) -> String {
        self.lines.join("\n")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_file(args.config.as_deref())
        .context("Problem while loading settings")?;

    let template =
        PromptTemplate::new(&settings.prompt.template).context("Invalid prompt template")?;
    let generator =
        OllamaGenerator::new(&settings.ollama).context("Invalid Ollama settings")?;
    println!("Chatting with `{}` at {}", generator.model(), settings.ollama.url);
    let service = AnswerService::new(template, Arc::new(generator));

    let mut transcript = Transcript::default();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let mut question = String::new();
        if std::io::stdin().read_line(&mut question)? == 0 {
            break;
        }
        let question = question.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        // The page records the user turn before asking, so the question
        // also appears at the end of the history.
        transcript.push_user(question);
        match service.answer(&transcript.context(), question).await {
            Ok(answer) => {
                println!("Bot: {answer}");
                transcript.push_ai(&answer);
            }
            Err(e) => eprintln!("Problem while generating an answer. {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::StubGenerator;

    #[test]
    fn transcript_accumulates_turns() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.context(), "");

        transcript.push_user("hi");
        assert_eq!(transcript.context(), "User: hi");

        transcript.push_ai("hello");
        transcript.push_user("how are you?");
        assert_eq!(
            transcript.context(),
            "User: hi\nAI: hello\nUser: how are you?"
        );
    }

    #[tokio::test]
    async fn transcript_feeds_the_prompt() {
        let stub = Arc::new(StubGenerator::answering("fine"));
        let service = AnswerService::new(
            PromptTemplate::new("{context}|{question}").unwrap(),
            stub.clone(),
        );
        let mut transcript = Transcript::default();

        transcript.push_user("hi");
        let answer = service.answer(&transcript.context(), "hi").await.unwrap();
        transcript.push_ai(&answer);
        transcript.push_user("and you?");
        service
            .answer(&transcript.context(), "and you?")
            .await
            .unwrap();

        assert_eq!(
            *stub.prompts.lock().unwrap(),
            vec![
                "User: hi|hi".to_string(),
                "User: hi\nAI: fine\nUser: and you?|and you?".to_string(),
            ]
        );
    }
}
