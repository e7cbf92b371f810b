//! An in-memory [`MemoryStore`] fake, used by every crate above
//! `cortex-storage` to unit-test against the trait without a real SQLite
//! database (spec §9 "the store boundary... every other layer sees only
//! `Memory`").

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use cortex_core::errors::CortexResult;
use cortex_core::link::{Link, Relationship};
use cortex_core::memory::{Memory, NewMemory, Truncation};
use cortex_core::traits::{MemoryFilter, MemoryStore, ResolvedDefaults, Stats};
use cortex_core::MemoryType;

pub struct InMemoryStore {
    memories: Mutex<BTreeMap<i64, Memory>>,
    links: Mutex<BTreeMap<i64, Link>>,
    next_memory_id: AtomicI64,
    next_link_id: AtomicI64,
    reinforcement_factor: f64,
    decay_rate: f64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_rates(1.2, 0.995)
    }

    pub fn with_rates(reinforcement_factor: f64, decay_rate: f64) -> Self {
        Self {
            memories: Mutex::new(BTreeMap::new()),
            links: Mutex::new(BTreeMap::new()),
            next_memory_id: AtomicI64::new(1),
            next_link_id: AtomicI64::new(1),
            reinforcement_factor,
            decay_rate,
        }
    }

    fn project_matches(filter_project: Option<&str>, row_project: &Option<String>) -> bool {
        match filter_project {
            None => true,
            Some(p) => row_project.as_deref() == Some(p) || row_project.is_none(),
        }
    }
}

impl MemoryStore for InMemoryStore {
    fn add(&self, mut input: NewMemory, resolved: ResolvedDefaults) -> CortexResult<(Memory, Truncation)> {
        input.validate()?;
        let truncation = input.truncate_content();
        let now = Utc::now();
        let id = self.next_memory_id.fetch_add(1, Ordering::SeqCst);
        let memory = Memory {
            id,
            memory_type: resolved.memory_type,
            category: resolved.category,
            title: input.title,
            content: input.content,
            project: input.project,
            tags: input.tags,
            salience: resolved.salience,
            decayed_score: resolved.salience,
            access_count: 0,
            created_at: now,
            last_accessed: now,
            metadata: input.metadata,
            embedding: input.embedding,
        };
        self.memories.lock().unwrap().insert(id, memory.clone());
        Ok((memory, truncation))
    }

    fn get(&self, id: i64) -> CortexResult<Option<Memory>> {
        Ok(self.memories.lock().unwrap().get(&id).cloned())
    }

    fn access(&self, id: i64) -> CortexResult<Option<Memory>> {
        let mut guard = self.memories.lock().unwrap();
        let Some(memory) = guard.get_mut(&id) else {
            return Ok(None);
        };
        let now = Utc::now();
        let hours_since_access = (now - memory.last_accessed).num_milliseconds() as f64 / 3_600_000.0;
        let decayed = cortex_decay::decayed(memory.salience, hours_since_access, memory.access_count, self.decay_rate);
        memory.decayed_score = (decayed * self.reinforcement_factor).min(1.0);
        memory.access_count += 1;
        memory.last_accessed = now;
        Ok(Some(memory.clone()))
    }

    fn update(&self, memory: &Memory) -> CortexResult<()> {
        self.memories.lock().unwrap().insert(memory.id, memory.clone());
        Ok(())
    }

    fn delete(&self, id: i64) -> CortexResult<()> {
        self.memories.lock().unwrap().remove(&id);
        self.links
            .lock()
            .unwrap()
            .retain(|_, l| l.source_id != id && l.target_id != id);
        Ok(())
    }

    fn query(&self, filter: &MemoryFilter) -> CortexResult<Vec<Memory>> {
        let guard = self.memories.lock().unwrap();
        let mut rows: Vec<Memory> = guard
            .values()
            .filter(|m| Self::project_matches(filter.project.as_deref(), &m.project))
            .filter(|m| filter.category.is_none() || filter.category == Some(m.category))
            .filter(|m| filter.memory_type.is_none() || filter.memory_type == Some(m.memory_type))
            .filter(|m| {
                filter.tags.is_empty() || filter.tags.iter().any(|t| m.tags.contains(t))
            })
            .filter(|m| filter.include_decayed || m.decayed_score >= m.category.deletion_threshold())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        if filter.limit > 0 {
            rows.truncate(filter.limit);
        }
        Ok(rows)
    }

    fn recent(&self, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>> {
        let guard = self.memories.lock().unwrap();
        let mut rows: Vec<Memory> = guard
            .values()
            .filter(|m| Self::project_matches(project, &m.project))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    fn high_priority(&self, limit: usize, project: Option<&str>) -> CortexResult<Vec<Memory>> {
        let guard = self.memories.lock().unwrap();
        let mut rows: Vec<Memory> = guard
            .values()
            .filter(|m| Self::project_matches(project, &m.project))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.salience
                .partial_cmp(&a.salience)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.decayed_score.partial_cmp(&a.decayed_score).unwrap_or(std::cmp::Ordering::Equal))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn stats(&self, project: Option<&str>) -> CortexResult<Stats> {
        let guard = self.memories.lock().unwrap();
        let rows: Vec<&Memory> = guard
            .values()
            .filter(|m| Self::project_matches(project, &m.project))
            .collect();
        let mut stats = Stats::default();
        stats.total = rows.len();
        for m in &rows {
            match m.memory_type {
                MemoryType::ShortTerm => stats.short_term += 1,
                MemoryType::LongTerm => stats.long_term += 1,
                MemoryType::Episodic => stats.episodic += 1,
            }
            *stats.by_category.entry(m.category.as_str().to_string()).or_insert(0) += 1;
        }
        stats.average_salience = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(|m| m.salience).sum::<f64>() / rows.len() as f64
        };
        Ok(stats)
    }

    fn all(&self, project: Option<&str>) -> CortexResult<Vec<Memory>> {
        let guard = self.memories.lock().unwrap();
        Ok(guard
            .values()
            .filter(|m| Self::project_matches(project, &m.project))
            .cloned()
            .collect())
    }

    fn create_link(
        &self,
        source_id: i64,
        target_id: i64,
        relationship: Relationship,
        strength: f64,
    ) -> CortexResult<bool> {
        if source_id == target_id {
            return Ok(false);
        }
        let mut guard = self.links.lock().unwrap();
        if guard
            .values()
            .any(|l| l.source_id == source_id && l.target_id == target_id && l.relationship == relationship)
        {
            return Ok(false);
        }
        let id = self.next_link_id.fetch_add(1, Ordering::SeqCst);
        guard.insert(
            id,
            Link {
                id,
                source_id,
                target_id,
                relationship,
                strength,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    fn delete_link(&self, id: i64) -> CortexResult<()> {
        self.links.lock().unwrap().remove(&id);
        Ok(())
    }

    fn links_from(&self, id: i64) -> CortexResult<Vec<Link>> {
        Ok(self.links.lock().unwrap().values().filter(|l| l.source_id == id).cloned().collect())
    }

    fn links_to(&self, id: i64) -> CortexResult<Vec<Link>> {
        Ok(self.links.lock().unwrap().values().filter(|l| l.target_id == id).cloned().collect())
    }

    fn all_links(&self) -> CortexResult<Vec<Link>> {
        Ok(self.links.lock().unwrap().values().cloned().collect())
    }

    fn export(&self, project: Option<&str>) -> CortexResult<(Vec<Memory>, Vec<Link>)> {
        let memories = self.all(project)?;
        let ids: std::collections::HashSet<i64> = memories.iter().map(|m| m.id).collect();
        let links = self
            .links
            .lock()
            .unwrap()
            .values()
            .filter(|l| ids.contains(&l.source_id) && ids.contains(&l.target_id))
            .cloned()
            .collect();
        Ok((memories, links))
    }

    fn import(&self, memories: Vec<Memory>, links: Vec<Link>) -> CortexResult<usize> {
        let mut id_map = BTreeMap::new();
        let mut guard = self.memories.lock().unwrap();
        for mut memory in memories {
            let old_id = memory.id;
            let new_id = if guard.contains_key(&memory.id) {
                self.next_memory_id.fetch_add(1, Ordering::SeqCst)
            } else {
                let next = self.next_memory_id.load(Ordering::SeqCst);
                if memory.id >= next {
                    self.next_memory_id.store(memory.id + 1, Ordering::SeqCst);
                }
                memory.id
            };
            memory.id = new_id;
            id_map.insert(old_id, new_id);
            guard.insert(new_id, memory);
        }
        drop(guard);
        let count = id_map.len();

        let mut links_guard = self.links.lock().unwrap();
        for link in links {
            let (Some(&source_id), Some(&target_id)) =
                (id_map.get(&link.source_id), id_map.get(&link.target_id))
            else {
                continue;
            };
            if links_guard
                .values()
                .any(|l| l.source_id == source_id && l.target_id == target_id && l.relationship == link.relationship)
            {
                continue;
            }
            let id = self.next_link_id.fetch_add(1, Ordering::SeqCst);
            links_guard.insert(
                id,
                Link {
                    id,
                    source_id,
                    target_id,
                    relationship: link.relationship,
                    strength: link.strength,
                    created_at: link.created_at,
                },
            );
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::memory::Category;

    #[test]
    fn add_and_get_round_trip() {
        let store = InMemoryStore::new();
        let (m, _) = store
            .add(
                NewMemory::new("t", "c"),
                ResolvedDefaults {
                    category: Category::Note,
                    memory_type: MemoryType::ShortTerm,
                    salience: 0.5,
                },
            )
            .unwrap();
        assert_eq!(store.get(m.id).unwrap().unwrap().title, "t");
    }

    #[test]
    fn delete_cascades_links() {
        let store = InMemoryStore::new();
        let (a, _) = store
            .add(
                NewMemory::new("a", "a"),
                ResolvedDefaults {
                    category: Category::Note,
                    memory_type: MemoryType::ShortTerm,
                    salience: 0.5,
                },
            )
            .unwrap();
        let (b, _) = store
            .add(
                NewMemory::new("b", "b"),
                ResolvedDefaults {
                    category: Category::Note,
                    memory_type: MemoryType::ShortTerm,
                    salience: 0.5,
                },
            )
            .unwrap();
        store.create_link(a.id, b.id, Relationship::Related, 0.5).unwrap();
        store.delete(a.id).unwrap();
        assert!(store.links_from(a.id).unwrap().is_empty());
    }
}
