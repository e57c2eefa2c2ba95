mod common;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier, Mutex};

use common::{Fixture, LogCounter, Outcome};
use gqlsp_memo::Cancelled;
use gqlsp_schema::{Schema, SchemaError, ValidationIssue};
use gqlsp_scope::{ProjectConfig, Scope};
use gqlsp_vfs::FileRef;
use pretty_assertions::assert_eq;
use tracing_subscriber::prelude::*;

fn shared_config() -> ProjectConfig {
    ProjectConfig {
        scope: Some(Scope::roots([PathBuf::from("/project/src")])),
        schema_scope: None,
    }
}

#[test]
fn test_equal_scopes_share_one_build() {
    let fixture = Fixture::new();
    fixture
        .resolver
        .configure("/project/src/a.graphql", shared_config());
    fixture
        .resolver
        .configure("/project/src/b.graphql", shared_config());

    let a = FileRef::new("/project/src/a.graphql");
    let b = FileRef::new("/project/src/b.graphql");

    let first = fixture.cache.schema_for(Some(&a)).unwrap();
    let second = fixture.cache.schema_for(Some(&b)).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fixture.registry.calls(), 1);
    assert_eq!(fixture.cache.cached_entries(), 1);
    assert!(first.is_valid());
    assert_eq!(first.schema.query_type().map(|t| t.fields.len()), Some(1));
}

#[test]
fn test_repeated_lookup_hits_cache() {
    let fixture = Fixture::new();
    let file = FileRef::new("/project/schema.graphql");

    let first = fixture.cache.schema_for(Some(&file)).unwrap();
    let second = fixture.cache.schema_for(Some(&file)).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fixture.registry.calls(), 1);
}

#[test]
fn test_config_reload_rebuilds_schema() {
    let fixture = Fixture::new();
    let file = FileRef::new("/project/schema.graphql");

    let before = fixture.cache.schema_for(Some(&file)).unwrap();
    fixture.resolver.generation.advance();
    let after = fixture.cache.schema_for(Some(&file)).unwrap();

    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.build_id > before.build_id);
    assert_eq!(fixture.registry.calls(), 2);
}

#[test]
fn test_structure_change_drops_whole_map() {
    let fixture = Fixture::new();
    fixture
        .resolver
        .configure("/project/src/a.graphql", shared_config());
    let a = FileRef::new("/project/src/a.graphql");
    let other = FileRef::new("/project/other.graphql");

    fixture.cache.schema_for(Some(&a)).unwrap();
    fixture.cache.schema_for(Some(&other)).unwrap();
    assert_eq!(fixture.cache.cached_entries(), 2);

    fixture.structure.advance();
    assert_eq!(fixture.cache.cached_entries(), 0);

    let scope = fixture.scopes.resolve_scope(Some(&a));
    assert!(!fixture.cache.is_cached(&scope));

    fixture.cache.schema_for(Some(&a)).unwrap();
    assert!(fixture.cache.is_cached(&scope));
    assert_eq!(fixture.registry.calls(), 3);
}

#[test]
fn test_cancellation_propagates_without_caching() {
    let fixture = Fixture::new();
    let file = FileRef::new("/project/schema.graphql");
    fixture.registry.set(Outcome::Cancel);

    let result = fixture.cache.schema_for(Some(&file));
    assert_eq!(result.unwrap_err(), Cancelled);

    let scope = fixture.scopes.resolve_scope(Some(&file));
    assert!(!fixture.cache.is_cached(&scope));

    fixture.registry.set(Outcome::Types(Vec::new()));
    let info = fixture.cache.schema_for(Some(&file)).unwrap();
    assert!(info.is_valid());
    assert!(fixture.cache.is_cached(&scope));
}

#[test]
fn test_cancellation_during_validation_is_not_cached() {
    let fixture = Fixture::new();
    let file = FileRef::new("/project/schema.graphql");
    fixture.validator.cancel.store(true, Ordering::SeqCst);

    let result = fixture.cache.schema_for(Some(&file));
    assert_eq!(result.unwrap_err(), Cancelled);
    assert_eq!(fixture.registry.calls(), 1);
    assert_eq!(fixture.cache.cached_entries(), 0);

    fixture.validator.cancel.store(false, Ordering::SeqCst);
    let info = fixture.cache.schema_for(Some(&file)).unwrap();
    assert!(info.is_valid());
    assert_eq!(fixture.registry.calls(), 2);
    assert_eq!(fixture.cache.cached_entries(), 1);
}

#[test]
fn test_concurrent_callers_share_first_published_schema() {
    const THREADS: usize = 8;

    let fixture = Fixture::new();
    fixture
        .resolver
        .configure("/project/src/a.graphql", shared_config());
    fixture
        .resolver
        .configure("/project/src/b.graphql", shared_config());
    let files = [
        FileRef::new("/project/src/a.graphql"),
        FileRef::new("/project/src/b.graphql"),
    ];
    let start = Barrier::new(THREADS);

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let file = &files[i % files.len()];
                let start = &start;
                let cache = &fixture.cache;
                s.spawn(move || {
                    start.wait();
                    cache.schema_for(Some(file)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|info| Arc::ptr_eq(info, &results[0])));
    assert_eq!(fixture.cache.cached_entries(), 1);
    assert!(fixture.registry.calls() >= 1);
}

#[test]
fn test_internal_failure_yields_empty_schema_and_logs() {
    let fixture = Fixture::new();
    let file = FileRef::new("/project/schema.graphql");
    fixture.registry.set(Outcome::Fail("registry exploded".to_string()));

    let count = Arc::new(Mutex::new(0));
    let subscriber = tracing_subscriber::registry().with(LogCounter {
        needle: "Schema build error",
        count: count.clone(),
    });

    let info = tracing::subscriber::with_default(subscriber, || {
        fixture.cache.schema_for(Some(&file)).unwrap()
    });

    assert_eq!(*info.schema, Schema::empty());
    assert_eq!(
        info.errors,
        vec![SchemaError::Internal("registry exploded".to_string())]
    );
    assert_eq!(*count.lock().unwrap(), 1);

    // The fallback is cached like any other result.
    let again = fixture.cache.schema_for(Some(&file)).unwrap();
    assert!(Arc::ptr_eq(&info, &again));
    assert_eq!(fixture.registry.calls(), 1);
}

#[test]
fn test_validation_issues_aggregate_into_one_error() {
    let fixture = Fixture::new();
    let file = FileRef::new("/project/schema.graphql");
    *fixture.validator.issues.lock() = vec![
        ValidationIssue::new("TypeAndFieldRule", "Type `User` must define fields"),
        ValidationIssue::new("UnionTypesChecker", "Union `Node` has no members"),
    ];

    let info = fixture.cache.schema_for(Some(&file)).unwrap();

    assert_eq!(info.errors.len(), 1);
    match &info.errors[0] {
        SchemaError::InvalidSchema(issues) => assert_eq!(issues.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!info.is_valid());
    assert!(info.schema.get_type("User").is_some());
}

#[test]
fn test_no_context_uses_empty_scope() {
    let fixture = Fixture::new();

    let info = fixture.cache.schema_for(None).unwrap();

    assert!(fixture.cache.is_cached(&Scope::Empty));
    assert_eq!(info.build_id, 1);
}
