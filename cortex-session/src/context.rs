//! C8: `generateContextSummary` / `formatContextSummary` (spec §4.8).

use cortex_core::errors::CortexResult;
use cortex_core::link::Relationship;
use cortex_core::memory::{Category, Memory};
use cortex_core::traits::MemoryStore;

#[derive(Debug, Clone, Default)]
pub struct ContextSummary {
    pub recent_memories: Vec<Memory>,
    pub key_decisions: Vec<Memory>,
    pub active_patterns: Vec<Memory>,
    pub pending_items: Vec<Memory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFormat {
    Summary,
    Detailed,
    Raw,
}

/// `generateContextSummary(project?) -> ContextSummary` (spec §4.8).
pub fn generate_context_summary(
    store: &dyn MemoryStore,
    project: Option<&str>,
) -> CortexResult<ContextSummary> {
    let all = store.all(project)?;

    let mut recent_memories = all.clone();
    recent_memories.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    recent_memories.truncate(10);

    let mut key_decisions: Vec<Memory> = all
        .iter()
        .filter(|m| matches!(m.category, Category::Architecture | Category::Preference))
        .cloned()
        .collect();
    key_decisions.sort_by(|a, b| b.salience.partial_cmp(&a.salience).unwrap_or(std::cmp::Ordering::Equal));
    key_decisions.truncate(5);

    let mut active_patterns: Vec<Memory> = all
        .iter()
        .filter(|m| m.category == Category::Pattern && m.decayed_score >= 0.4)
        .cloned()
        .collect();
    active_patterns.sort_by(|a, b| b.salience.partial_cmp(&a.salience).unwrap_or(std::cmp::Ordering::Equal));
    active_patterns.truncate(5);

    let mut pending_items = Vec::new();
    for memory in all.iter().filter(|m| m.category == Category::Todo) {
        let incoming = store.links_to(memory.id)?;
        let blocked = incoming
            .iter()
            .any(|l| matches!(l.relationship, Relationship::Contradicts | Relationship::Supersedes));
        if !blocked {
            pending_items.push(memory.clone());
        }
        if pending_items.len() == 20 {
            break;
        }
    }

    Ok(ContextSummary {
        recent_memories,
        key_decisions,
        active_patterns,
        pending_items,
    })
}

/// Markdown rendering in a stable section order. `Detailed` adds salience
/// and tags per memory; `Raw` emits one line per memory with no sections;
/// `Summary` is titles only.
pub fn format_context_summary(summary: &ContextSummary, format: ContextFormat) -> String {
    if format == ContextFormat::Raw {
        let mut lines = Vec::new();
        for memory in &summary.recent_memories {
            lines.push(format!("{}\t{}", memory.id, memory.title));
        }
        return lines.join("\n");
    }

    let mut out = String::new();
    render_section(&mut out, "Recent Memories", &summary.recent_memories, format);
    render_section(&mut out, "Key Decisions", &summary.key_decisions, format);
    render_section(&mut out, "Active Patterns", &summary.active_patterns, format);
    render_section(&mut out, "Pending Items", &summary.pending_items, format);
    out
}

fn render_section(out: &mut String, title: &str, memories: &[Memory], format: ContextFormat) {
    if memories.is_empty() {
        return;
    }
    out.push_str(&format!("## {title}\n\n"));
    for memory in memories {
        match format {
            ContextFormat::Detailed => {
                out.push_str(&format!(
                    "- **{}** (salience {:.2}) — {}\n",
                    memory.title,
                    memory.salience,
                    memory.tags.join(", ")
                ));
            }
            _ => {
                out.push_str(&format!("- {}\n", memory.title));
            }
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::memory::{MemoryType, NewMemory};
    use cortex_core::traits::ResolvedDefaults;
    use test_fixtures::InMemoryStore;

    fn add(store: &InMemoryStore, title: &str, category: Category, salience: f64) -> Memory {
        let (m, _) = store
            .add(
                NewMemory::new(title, "content"),
                ResolvedDefaults {
                    category,
                    memory_type: MemoryType::LongTerm,
                    salience,
                },
            )
            .unwrap();
        m
    }

    #[test]
    fn groups_by_category_and_caps_counts() {
        let store = InMemoryStore::new();
        add(&store, "decision", Category::Architecture, 0.9);
        add(&store, "pattern", Category::Pattern, 0.6);
        add(&store, "todo", Category::Todo, 0.5);

        let summary = generate_context_summary(&store, None).unwrap();
        assert_eq!(summary.key_decisions.len(), 1);
        assert_eq!(summary.active_patterns.len(), 1);
        assert_eq!(summary.pending_items.len(), 1);
    }

    #[test]
    fn blocked_pending_items_excluded() {
        let store = InMemoryStore::new();
        let todo = add(&store, "todo", Category::Todo, 0.5);
        let other = add(&store, "other", Category::Note, 0.5);
        store
            .create_link(other.id, todo.id, Relationship::Supersedes, 0.9)
            .unwrap();

        let summary = generate_context_summary(&store, None).unwrap();
        assert!(summary.pending_items.is_empty());
    }

    #[test]
    fn markdown_sections_in_stable_order() {
        let store = InMemoryStore::new();
        add(&store, "decision", Category::Architecture, 0.9);
        let summary = generate_context_summary(&store, None).unwrap();
        let rendered = format_context_summary(&summary, ContextFormat::Summary);
        assert!(rendered.contains("## Recent Memories"));
        assert!(rendered.find("Recent Memories").unwrap() < rendered.find("Key Decisions").unwrap());
    }
}
