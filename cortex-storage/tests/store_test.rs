use cortex_core::link::Relationship;
use cortex_core::memory::NewMemory;
use cortex_core::traits::{MemoryFilter, MemoryStore, ResolvedDefaults};
use cortex_core::{Category, MemoryType};
use cortex_storage::SqliteStore;

fn resolved(category: Category, memory_type: MemoryType, salience: f64) -> ResolvedDefaults {
    ResolvedDefaults {
        category,
        memory_type,
        salience,
    }
}

fn store() -> SqliteStore {
    SqliteStore::open_in_memory(1.2, 0.995).unwrap()
}

#[test]
fn add_and_get_round_trips() {
    let s = store();
    let input = NewMemory::new("title", "content");
    let (m, trunc) = s
        .add(input, resolved(Category::Note, MemoryType::ShortTerm, 0.5))
        .unwrap();
    assert!(!trunc.was_truncated);
    assert_eq!(m.access_count, 0);
    let fetched = s.get(m.id).unwrap().unwrap();
    assert_eq!(fetched.title, "title");
    assert_eq!(fetched.salience, 0.5);
}

#[test]
fn access_reinforces_and_increments_count() {
    let s = store();
    let (m, _) = s
        .add(
            NewMemory::new("t", "c"),
            resolved(Category::Note, MemoryType::ShortTerm, 0.5),
        )
        .unwrap();
    // negligible elapsed time between add and access: decayed score
    // recomputes from salience (0.5) with ~0 hours of decay, then
    // reinforces by 1.2x.
    let once = s.access(m.id).unwrap().unwrap();
    assert_eq!(once.access_count, 1);
    assert!((once.decayed_score - 0.6).abs() < 1e-2, "got {}", once.decayed_score);

    let twice = s.access(m.id).unwrap().unwrap();
    assert_eq!(twice.access_count, 2);
    assert!(twice.decayed_score >= once.decayed_score);
}

#[test]
fn delete_cascades_to_links() {
    let s = store();
    let (a, _) = s
        .add(
            NewMemory::new("a", "a"),
            resolved(Category::Architecture, MemoryType::LongTerm, 0.8),
        )
        .unwrap();
    let (b, _) = s
        .add(
            NewMemory::new("b", "b"),
            resolved(Category::Architecture, MemoryType::LongTerm, 0.8),
        )
        .unwrap();
    assert!(s.create_link(a.id, b.id, Relationship::Related, 0.7).unwrap());
    assert_eq!(s.links_from(a.id).unwrap().len(), 1);

    s.delete(a.id).unwrap();
    assert!(s.links_from(a.id).unwrap().is_empty());
    assert!(s.links_to(b.id).unwrap().is_empty());
}

#[test]
fn self_link_rejected_and_duplicate_ignored() {
    let s = store();
    let (a, _) = s
        .add(
            NewMemory::new("a", "a"),
            resolved(Category::Note, MemoryType::ShortTerm, 0.5),
        )
        .unwrap();
    assert!(!s.create_link(a.id, a.id, Relationship::Related, 0.5).unwrap());

    let (b, _) = s
        .add(
            NewMemory::new("b", "b"),
            resolved(Category::Note, MemoryType::ShortTerm, 0.5),
        )
        .unwrap();
    assert!(s.create_link(a.id, b.id, Relationship::Related, 0.5).unwrap());
    assert!(!s.create_link(a.id, b.id, Relationship::Related, 0.9).unwrap());
}

#[test]
fn project_filter_includes_global_rows() {
    let s = store();
    let mut scoped = NewMemory::new("scoped", "c");
    scoped.project = Some("proj-foo".into());
    s.add(scoped, resolved(Category::Note, MemoryType::ShortTerm, 0.5))
        .unwrap();
    let global = NewMemory::new("global", "c");
    s.add(global, resolved(Category::Note, MemoryType::ShortTerm, 0.5))
        .unwrap();

    let filter = MemoryFilter {
        project: Some("proj-foo".into()),
        include_decayed: true,
        ..Default::default()
    };
    let results = s.query(&filter).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn export_import_round_trips() {
    let s = store();
    let (a, _) = s
        .add(
            NewMemory::new("a", "content a"),
            resolved(Category::Architecture, MemoryType::LongTerm, 0.8),
        )
        .unwrap();
    let (b, _) = s
        .add(
            NewMemory::new("b", "content b"),
            resolved(Category::Architecture, MemoryType::LongTerm, 0.7),
        )
        .unwrap();
    s.create_link(a.id, b.id, Relationship::Supports, 0.6).unwrap();

    let (memories, links) = s.export(None).unwrap();
    assert_eq!(memories.len(), 2);
    assert_eq!(links.len(), 1);

    let s2 = store();
    let imported = s2.import(memories, links).unwrap();
    assert_eq!(imported, 2);
    assert_eq!(s2.all_links().unwrap().len(), 1);
}

#[test]
fn stats_reflect_type_and_category_counts() {
    let s = store();
    s.add(
        NewMemory::new("a", "a"),
        resolved(Category::Architecture, MemoryType::LongTerm, 0.8),
    )
    .unwrap();
    s.add(
        NewMemory::new("b", "b"),
        resolved(Category::Note, MemoryType::ShortTerm, 0.4),
    )
    .unwrap();
    let stats = s.stats(None).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.long_term, 1);
    assert_eq!(stats.short_term, 1);
    assert_eq!(stats.by_category.get("architecture"), Some(&1));
}
