//! Buffer lifecycle against a store with real savepoint semantics

use crate::fixtures::{compiler, doc, entry};
use crate::mock_store::{execute_ids, MemoryStore};
use cairndb::{BufferState, DocId, FlushOutcome, PendingBuffer, QuerySpec};
use serde_json::json;

#[test]
fn test_flush_twice_performs_zero_additional_writes() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("draft"))]));

    buffer.flush(&mut store).unwrap();
    let writes = store.applied_ops;

    assert_eq!(buffer.flush(&mut store).unwrap(), FlushOutcome::NoOp);
    assert_eq!(store.applied_ops, writes);
}

#[test]
fn test_savepoint_rollback_with_speculative_store_state() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("old"))]), None);
    store.seed(2, "/b", doc(&[("status", json!("old"))]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("new"))]));
    buffer.flush(&mut store).unwrap();

    // Enclosing transaction takes a savepoint, then speculative work happens
    let snapshot = buffer.savepoint();
    buffer.set(DocId::new(2), entry("/b", &[("status", json!("new"))]));
    buffer.flush(&mut store).unwrap();

    let plan = compiler
        .compile(&QuerySpec::new().with_term("status", "new"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1, 2]);

    // Rollback: the buffer restores, and the next flush reconciles the store
    buffer.rollback(&snapshot);
    buffer.flush(&mut store).unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);
}

#[test]
fn test_commit_makes_writes_durable_and_resets() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("done"))]));
    buffer.flush(&mut store).unwrap();
    buffer.commit(&mut store).unwrap();

    assert_eq!(buffer.state(), BufferState::Idle);
    assert!(buffer.is_empty());
    assert_eq!(
        store.row(1).unwrap().doc.get("status"),
        Some(&json!("done"))
    );

    // The buffer is reusable for the next transaction
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("again"))]));
    assert_eq!(buffer.generation(), 1);
}

#[test]
fn test_abort_restores_pre_transaction_state() {
    let compiler = compiler();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("keep"))]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("discard"))]));
    buffer.flush(&mut store).unwrap();
    buffer.abort(&mut store).unwrap();

    let plan = compiler
        .compile(&QuerySpec::new().with_term("status", "keep"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);
    assert!(buffer.is_empty());
}

#[test]
fn test_commit_without_flush_writes_directly() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("status", json!("direct"))]));
    buffer.commit(&mut store).unwrap();

    assert_eq!(
        store.row(1).unwrap().doc.get("status"),
        Some(&json!("direct"))
    );
}

#[test]
fn test_multiple_rollbacks_are_safe() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("v", json!(1))]));
    let snapshot = buffer.savepoint();

    buffer.merge_partial(DocId::new(1), doc(&[("v", json!(2))]));
    buffer.rollback(&snapshot);
    buffer.rollback(&snapshot);
    // Cleanup-path rollback when nothing speculative is active
    buffer.rollback(&snapshot);

    buffer.flush(&mut store).unwrap();
    buffer.commit(&mut store).unwrap();
    assert_eq!(store.row(1).unwrap().doc.get("v"), Some(&json!(1)));
}

#[test]
fn test_mixed_generation_commit() {
    // flush, more mutations, then commit: the final state wins, once
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[]), None);

    let mut buffer = PendingBuffer::new();
    buffer.set(DocId::new(1), entry("/a", &[("step", json!(1))]));
    buffer.flush(&mut store).unwrap();
    buffer.merge_partial(DocId::new(1), doc(&[("step", json!(2))]));
    buffer.commit(&mut store).unwrap();

    assert_eq!(store.row(1).unwrap().doc.get("step"), Some(&json!(2)));
    // No leftover savepoints on the store side
    assert_eq!(store.row_count(), 1);
}
