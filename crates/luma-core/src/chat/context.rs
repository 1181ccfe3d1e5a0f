//! Context assembler.
//!
//! Renders everything the user has stored (people and memories) into the
//! plain-text block the assistant is given on every chat request. The
//! context is recomputed each time and never cached.

use std::fmt::Write;

use uuid::Uuid;

use luma_types::error::ChatError;
use luma_types::memory::MemoryDetail;
use luma_types::person::Person;

use crate::repository::memory::MemoryRepository;
use crate::repository::person::PersonRepository;

/// Loads a user's people and memories and renders them for the prompt.
pub struct ContextAssembler<M: MemoryRepository, P: PersonRepository> {
    memory_repo: M,
    person_repo: P,
}

impl<M: MemoryRepository, P: PersonRepository> ContextAssembler<M, P> {
    pub fn new(memory_repo: M, person_repo: P) -> Self {
        Self {
            memory_repo,
            person_repo,
        }
    }

    pub async fn build_context(&self, user_id: &Uuid) -> Result<String, ChatError> {
        let mut memories = self
            .memory_repo
            .list_for_user(user_id)
            .await
            .map_err(|e| ChatError::Context(e.to_string()))?;
        let people = self
            .person_repo
            .list_for_user(user_id)
            .await
            .map_err(|e| ChatError::Context(e.to_string()))?;

        // Oldest first reads like a timeline.
        memories.sort_by(|a, b| a.memory.created_at.cmp(&b.memory.created_at));

        tracing::debug!(
            user_id = %user_id,
            memories = memories.len(),
            people = people.len(),
            "assembled chat context"
        );
        Ok(render_context(&memories, &people))
    }
}

/// Render people then memories. Each section header appears only when its
/// collection is non-empty; no input at all gives an empty string.
pub fn render_context(memories: &[MemoryDetail], people: &[Person]) -> String {
    let mut out = String::new();

    if !people.is_empty() {
        out.push_str("Important People in Your Life:\n");
        for person in people {
            let _ = writeln!(
                out,
                "- {} {} ({}): {}",
                person.first_name, person.last_name, person.relationship, person.notes
            );
        }
        out.push('\n');
    }

    if !memories.is_empty() {
        out.push_str("Your Memories and Events:\n");
        for detail in memories {
            let memory = &detail.memory;
            let _ = writeln!(
                out,
                "- {} ({}): {}",
                memory.title, memory.memory_type, memory.content
            );
            if !detail.people.is_empty() {
                let names: Vec<String> = detail.people.iter().map(Person::full_name).collect();
                let _ = writeln!(out, "  People involved: {}", names.join(", "));
            }
        }
    }

    out
}
