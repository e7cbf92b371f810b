use cortex_core::memory::{Importance, NewMemory};
use cortex_core::CortexConfig;
use cortex_engine::recall::RecallRequest;
use cortex_engine::Engine;
use cortex_session::ContextFormat;

fn engine() -> Engine {
    Engine::open_in_memory(CortexConfig::default()).unwrap()
}

#[test]
fn remember_then_recall_round_trip() {
    let engine = engine();
    let remembered = engine
        .remember(NewMemory::new(
            "remember that we use REST",
            "we decided to use REST for all our HTTP APIs, it's our architecture decision",
        ))
        .unwrap();
    assert!(remembered.salience > 0.25);

    let response = engine
        .recall(RecallRequest {
            query: Some("REST APIs".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert!(response.count >= 1);
    assert!(response.memories.iter().any(|m| m.id == remembered.id));
}

#[test]
fn recall_recent_mode_orders_by_created_at() {
    let engine = engine();
    engine.remember(NewMemory::new("first", "first note")).unwrap();
    let second = engine.remember(NewMemory::new("second", "second note")).unwrap();

    let response = engine
        .recall(RecallRequest {
            mode: cortex_core::traits::RecallMode::Recent,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(response.memories[0].id, second.id);
}

#[test]
fn critical_importance_forces_long_term() {
    let engine = engine();
    let mut input = NewMemory::new("always use prepared statements", "sql safety note");
    input.importance = Some(Importance::Critical);
    let response = engine.remember(input).unwrap();
    assert_eq!(response.memory_type, "long_term");
    assert_eq!(response.salience, 1.0);
}

#[test]
fn get_context_renders_stable_sections() {
    let engine = engine();
    engine
        .remember(NewMemory::new("we decided to use REST", "architecture decision about APIs"))
        .unwrap();

    let response = engine.get_context(None, None, ContextFormat::Summary).unwrap();
    assert!(response.context.contains("Key Decisions") || response.context.is_empty());
}

#[test]
fn session_lifecycle_runs_consolidation_on_end() {
    let engine = engine();
    let session = engine.start_session(Some("demo-project")).unwrap();
    engine
        .remember(NewMemory::new("note", "short lived note about the demo project"))
        .unwrap();

    let response = engine.end_session(session.id, Some("wrapped up demo work")).unwrap();
    assert!(response.consolidation_result.deleted <= 1);
}

#[test]
fn export_then_import_round_trips_into_a_fresh_engine() {
    let source = engine();
    source
        .remember(NewMemory::new("exportable note", "content that survives export"))
        .unwrap();

    let exported = source.export(None).unwrap();
    assert_eq!(exported.count, 1);

    let target = engine();
    let imported = target.import(exported.data).unwrap();
    assert_eq!(imported.imported, 1);

    let stats = target.stats(None).unwrap();
    assert_eq!(stats.total, 1);
}

#[test]
fn consolidate_leaves_a_fresh_low_salience_note_untouched() {
    let engine = engine();
    engine.remember(NewMemory::new("note one", "some content")).unwrap();
    let result = engine.consolidate(None, false).unwrap();
    assert_eq!(result.consolidated, 0);
    assert_eq!(result.deleted, 0);
}

#[test]
fn recall_with_limit_zero_is_a_validation_error() {
    let engine = engine();
    let result = engine.recall(RecallRequest {
        limit: Some(0),
        ..Default::default()
    });
    assert!(matches!(result, Err(cortex_core::errors::CortexError::Validation(_))));
}

#[test]
fn health_reports_healthy_for_a_fresh_store() {
    let engine = engine();
    let report = engine.health(None).unwrap();
    assert_eq!(report.status, cortex_observability::HealthStatus::Healthy);
}
