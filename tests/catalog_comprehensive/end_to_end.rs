//! Register → stage → flush → compile → execute flows

use crate::fixtures::{compiler, doc, entry, standard_registry};
use crate::mock_store::{execute, execute_ids, MemoryStore};
use cairndb::search::detect_backend;
use cairndb::{DocId, FlushOutcome, PendingBuffer, QueryCompiler, QuerySpec};
use serde_json::json;

#[test]
fn test_catalog_then_query_roundtrip() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("draft"))]));
    assert_eq!(
        buffer.flush(&mut store).unwrap(),
        FlushOutcome::Applied { ops: 1 }
    );

    let hit = compiler
        .compile(&QuerySpec::new().with_term("status", "draft"))
        .unwrap();
    assert_eq!(execute_ids(&store, &hit), vec![1]);

    let miss = compiler
        .compile(&QuerySpec::new().with_term("status", "published"))
        .unwrap();
    assert!(execute_ids(&store, &miss).is_empty());
}

#[test]
fn test_flushed_writes_visible_before_commit() {
    // Read-your-writes: a flush inside the transaction is queryable by
    // later reads in the same transaction, before any commit.
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("draft"))]), None);

    let mut buffer = PendingBuffer::new();
    buffer.merge_partial(DocId::new(1), doc(&[("status", json!("published"))]));
    buffer.flush(&mut store).unwrap();

    let plan = compiler
        .compile(&QuerySpec::new().with_term("status", "published"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);

    // Abort retracts the speculative write
    buffer.abort(&mut store).unwrap();
    assert!(execute_ids(&store, &plan).is_empty());
}

#[test]
fn test_uncatalog_removes_document() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("draft"))]), None);
    store.seed(2, "/b", doc(&[("status", json!("draft"))]), None);

    let mut buffer = PendingBuffer::new();
    buffer.uncatalog(DocId::new(2));
    buffer.flush(&mut store).unwrap();
    buffer.commit(&mut store).unwrap();

    let plan = compiler
        .compile(&QuerySpec::new().with_term("status", "draft"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);
    assert_eq!(store.row_count(), 1);
}

#[test]
fn test_new_document_defers_until_commit() {
    let compiler = compiler();
    let mut store = MemoryStore::new();

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(7), entry("/fresh", &[("status", json!("draft"))]));
    assert_eq!(buffer.flush(&mut store).unwrap(), FlushOutcome::Deferred);

    // Not visible while deferred
    let plan = compiler
        .compile(&QuerySpec::new().with_term("status", "draft"))
        .unwrap();
    assert!(execute_ids(&store, &plan).is_empty());

    buffer.commit(&mut store).unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![7]);
}

#[test]
fn test_full_text_end_to_end() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), Some("the quick brown fox"));
    store.seed(2, "/b", doc(&[]), Some("lazy dogs sleep"));

    let plan = compiler
        .compile(&QuerySpec::new().with_term("text", "quick fox"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);

    // Both tokens must match
    let plan = compiler
        .compile(&QuerySpec::new().with_term("text", "quick dogs"))
        .unwrap();
    assert!(execute_ids(&store, &plan).is_empty());
}

#[test]
fn test_detected_backend_serves_full_text() {
    // This store has no text-search capability, so detection settles on
    // the baseline backend and full-text queries still work.
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), Some("hello world"));

    let backend = detect_backend(&store);
    assert_eq!(backend.name(), "basic");

    let compiler = QueryCompiler::new(standard_registry(), backend);
    let plan = compiler
        .compile(&QuerySpec::new().with_term("text", "hello"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);
}

#[test]
fn test_handles_hydrate_from_producing_snapshot() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(
        1,
        "/a",
        doc(&[("status", json!("draft")), ("title", json!("Hello"))]),
        None,
    );

    let plan = compiler
        .compile(&QuerySpec::new().with_term("status", "draft"))
        .unwrap();
    let results = execute(&store, &plan);
    let handle = results.get(0).unwrap();

    // Mutate the store after execution; the handle still sees the
    // snapshot it came from
    let mut buffer = PendingBuffer::new();
    buffer.merge_partial(DocId::new(1), doc(&[("title", json!("Changed"))]));
    buffer.flush(&mut store).unwrap();

    assert_eq!(handle.get("title").unwrap(), Some(json!("Hello")));
    assert_eq!(handle.path().as_str(), "/a");
}

#[test]
fn test_merge_partial_updates_subset_of_keys() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(
        1,
        "/a",
        doc(&[("status", json!("draft")), ("position", json!(3))]),
        None,
    );

    let mut buffer = PendingBuffer::new();
    buffer.merge_partial(DocId::new(1), doc(&[("status", json!("published"))]));
    buffer.flush(&mut store).unwrap();
    buffer.commit(&mut store).unwrap();

    // Patched key changed, untouched key survived
    let plan = compiler
        .compile(
            &QuerySpec::new()
                .with_term("status", "published")
                .with_term("position", 3),
        )
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);
}
