use crate::prompts::editor_assistant_prompt::EDITOR_ASSISTANT_PROMPT;
use crate::structs::ai::openai::openai_message::OpenAIMessage;
use crate::structs::edit_request::EditRequest;

pub fn generate_edit_prompt(markdown: &str, user_message: &str) -> String {
    format!(
        "Current markdown content:\n```markdown\n{}\n```\n\nUser request: {}",
        markdown, user_message
    )
}

pub fn generate_edit_messages(request: &EditRequest) -> Vec<OpenAIMessage> {
    vec![
        OpenAIMessage::system(EDITOR_ASSISTANT_PROMPT),
        OpenAIMessage::user(&generate_edit_prompt(request.markdown(), request.user_message())),
    ]
}
