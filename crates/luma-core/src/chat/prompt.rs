//! Prompt builder for the memory assistant.
//!
//! The model receives a single flattened user message: a fixed persona, the
//! user's rendered personal context, then the message itself. No earlier
//! turns are replayed.

/// Fixed persona preamble.
pub const PERSONA: &str = "You are a compassionate AI assistant designed to help people with memory loss and dementia. \nYour role is to help them remember important information about their life, people, and events.\n\nIMPORTANT GUIDELINES:\n- Be patient, kind, and understanding\n- Use simple, clear language\n- If you don't have information about something, say so gently\n- Focus on positive memories and helpful information\n- Be encouraging and supportive\n- If someone seems confused, help clarify gently\n- Always be respectful and dignified";

/// Builds the flattened prompt sent as the only message of a completion.
///
/// Layout:
/// ```text
/// {persona}
///
/// User's Personal Information:
/// {context}
///
/// User: {message}
/// ```
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(context: &str, message: &str) -> String {
        format!("{PERSONA}\n\nUser's Personal Information:\n{context}\n\nUser: {message}")
    }
}
