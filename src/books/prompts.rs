use crate::llm::{ChatMessage, ChatRequest};

pub const SYSTEM_PROMPT: &str = "You're a friendly book expert.";

pub const EXPLAIN_MAX_TOKENS: u32 = 120;
pub const CHAT_MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;

pub fn explain(title: &str, author: &str, description: &str, language: &str) -> ChatRequest {
    let prompt = format!(
        "You're a helpful book recommender.\n\
         Title: {title}\n\
         Author(s): {author}\n\
         Description: {description}\n\
         Explain to a reader why they might like this book in 2-3 {language} sentences."
    );
    ChatRequest {
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        temperature: TEMPERATURE,
        max_tokens: EXPLAIN_MAX_TOKENS,
    }
}

pub fn chatbot(message: &str, language: &str) -> ChatRequest {
    let prompt = format!(
        "You're a helpful book recommender. Based on this question from the user:\n\
         \"{message}\"\n\
         Suggest 1-2 suitable books and explain shortly in {language}. \
         If they have any question about any book or books you provided, answer them in {language}."
    );
    ChatRequest {
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        temperature: TEMPERATURE,
        max_tokens: CHAT_MAX_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn explain_prompt_carries_book_fields() {
        let req = explain("Dune", "Frank Herbert", "Desert planet.", "Vietnamese");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        let user = &req.messages[1].content;
        assert!(user.contains("Title: Dune"));
        assert!(user.contains("Author(s): Frank Herbert"));
        assert!(user.contains("Description: Desert planet."));
        assert!(user.contains("2-3 Vietnamese sentences"));
        assert_eq!(req.max_tokens, 120);
    }

    #[test]
    fn chatbot_prompt_quotes_message() {
        let req = chatbot("something like Dune?", "English");
        let user = &req.messages[1].content;
        assert!(user.contains("\"something like Dune?\""));
        assert!(user.contains("in English"));
        assert_eq!(req.max_tokens, 300);
    }
}
