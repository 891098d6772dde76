pub mod editor_assistant_prompt;
