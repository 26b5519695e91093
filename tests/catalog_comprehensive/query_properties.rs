//! Semantic pins for compiled queries, run through the reference executor

use crate::fixtures::{compiler, doc, init_tracing, standard_registry};
use crate::mock_store::{execute, execute_ids, execute_paths, MemoryStore};
use cairndb::search::BasicRanking;
use cairndb::{
    Param, QueryCompiler, QuerySpec, RangeMode, SetOperator, SortDirection, TermOptions,
};
use serde_json::json;
use std::sync::Arc;

fn keyword_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.seed(1, "/one", doc(&[("tags", json!(["a"]))]), None);
    store.seed(2, "/two", doc(&[("tags", json!(["b"]))]), None);
    store.seed(3, "/three", doc(&[("tags", json!(["a", "b"]))]), None);
    store.seed(4, "/four", doc(&[("tags", json!(["c"]))]), None);
    store
}

/// Tree fixture: {/r, /r/a, /r/a/x, /r/b}
fn tree_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.seed(1, "/r", doc(&[]), None);
    store.seed(2, "/r/a", doc(&[]), None);
    store.seed(3, "/r/a/x", doc(&[]), None);
    store.seed(4, "/r/b", doc(&[]), None);
    store
}

#[test]
fn test_field_value_never_appears_in_predicate_text() {
    // For every registered generic index, the queried literal binds as a
    // parameter and its text never leaks into the predicate.
    let compiler = compiler();
    for (index, value) in [
        ("status", json!("SENTINEL_VALUE")),
        ("tags", json!(["SENTINEL_VALUE"])),
        ("created", json!("2031-11-22T03:04:05Z")),
        ("uid", json!("550e8400-e29b-41d4-a716-446655440000")),
    ] {
        let plan = compiler
            .compile(&QuerySpec::new().with_term(index, value))
            .unwrap();
        assert!(!plan.predicate.contains("SENTINEL"), "index {}", index);
        assert!(!plan.predicate.contains("2031"), "index {}", index);
        assert!(!plan.predicate.contains("550e8400"), "index {}", index);
        assert!(!plan.params.is_empty(), "index {}", index);
    }
}

#[test]
fn test_keyword_or_matches_any() {
    let store = keyword_store();
    let plan = compiler()
        .compile(&QuerySpec::new().with_options(
            "tags",
            TermOptions::query(json!(["a", "b"])).with_operator(SetOperator::Or),
        ))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1, 2, 3]);
}

#[test]
fn test_keyword_and_matches_all() {
    let store = keyword_store();
    let plan = compiler()
        .compile(&QuerySpec::new().with_options(
            "tags",
            TermOptions::query(json!(["a", "b"])).with_operator(SetOperator::And),
        ))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![3]);
}

#[test]
fn test_path_mode_truth_table() {
    let store = tree_store();
    let compiler = compiler();

    let subtree = compiler
        .compile(&QuerySpec::new().with_term("path", "/r/a"))
        .unwrap();
    assert_eq!(execute_paths(&store, &subtree), vec!["/r/a", "/r/a/x"]);

    let children = compiler
        .compile(&QuerySpec::new().with_options(
            "path",
            TermOptions::query(json!("/r")).with_depth(1),
        ))
        .unwrap();
    assert_eq!(execute_paths(&store, &children), vec!["/r/a", "/r/b"]);

    let exact = compiler
        .compile(&QuerySpec::new().with_options(
            "path",
            TermOptions::query(json!("/r/a")).with_depth(0),
        ))
        .unwrap();
    assert_eq!(execute_paths(&store, &exact), vec!["/r/a"]);
}

#[test]
fn test_path_depth_limited_subtree() {
    let store = tree_store();
    let plan = compiler()
        .compile(&QuerySpec::new().with_options(
            "path",
            TermOptions::query(json!("/r")).with_depth(2),
        ))
        .unwrap();
    // Depth 2 below /r reaches everything in this tree
    assert_eq!(
        execute_paths(&store, &plan),
        vec!["/r", "/r/a", "/r/a/x", "/r/b"]
    );

    let mut deeper = tree_store();
    deeper.seed(5, "/r/a/x/deep", doc(&[]), None);
    assert_eq!(
        execute_paths(&deeper, &plan),
        vec!["/r", "/r/a", "/r/a/x", "/r/b"]
    );
}

#[test]
fn test_path_breadcrumbs_and_navigation() {
    let store = tree_store();
    let compiler = compiler();

    let breadcrumbs = compiler
        .compile(&QuerySpec::new().with_options(
            "path",
            TermOptions::query(json!("/r/a/x")).with_depth(0).with_navtree(0),
        ))
        .unwrap();
    assert_eq!(
        execute_paths(&store, &breadcrumbs),
        vec!["/r", "/r/a", "/r/a/x"]
    );

    // Navigation: children of every ancestor of /r/a (and of the root)
    let navigation = compiler
        .compile(&QuerySpec::new().with_options(
            "path",
            TermOptions::query(json!("/r/a")).with_navtree(0),
        ))
        .unwrap();
    assert_eq!(
        execute_paths(&store, &navigation),
        vec!["/r", "/r/a", "/r/a/x", "/r/b"]
    );

    // Skipping the top level drops the root's children set
    let trimmed = compiler
        .compile(&QuerySpec::new().with_options(
            "path",
            TermOptions::query(json!("/r/a")).with_navtree(1),
        ))
        .unwrap();
    assert_eq!(execute_paths(&store, &trimmed), vec!["/r/a", "/r/a/x", "/r/b"]);
}

#[test]
fn test_pagination_with_total() {
    let mut store = MemoryStore::new();
    for id in 1..=5 {
        store.seed(id, &format!("/doc{}", id), doc(&[("status", json!("on"))]), None);
    }

    let plan = compiler()
        .compile(
            &QuerySpec::new()
                .with_term("status", "on")
                .with_limit(2)
                .with_batch(99, 2),
        )
        .unwrap();
    assert_eq!(plan.limit, Some(2));
    assert_eq!(plan.offset, 2);

    let results = execute(&store, &plan);
    assert_eq!(results.len(), 2);
    assert_eq!(results.total(), 5);
    assert_eq!(
        results.iter().map(|h| h.id().as_i64()).collect::<Vec<_>>(),
        vec![3, 4]
    );

    // Slicing keeps the original total
    assert_eq!(results.slice(0..1).total(), 5);
}

#[test]
fn test_absent_value_is_noop_not_match_nothing() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("draft"))]), None);

    let compiler = compiler();
    let empty = compiler.compile(&QuerySpec::new()).unwrap();
    let with_null = compiler
        .compile(&QuerySpec::new().with_options("status", TermOptions::default()))
        .unwrap();

    assert_eq!(with_null, empty);
    // A no-op term matches everything the empty spec matches (not nothing)
    assert_eq!(execute_ids(&store, &with_null), vec![1]);
}

#[test]
fn test_field_range_semantics() {
    let mut store = MemoryStore::new();
    for (id, pos) in [(1, 1), (2, 5), (3, 9)] {
        store.seed(id, &format!("/p{}", id), doc(&[("position", json!(pos))]), None);
    }
    let compiler = compiler();

    let min = compiler
        .compile(&QuerySpec::new().with_options(
            "position",
            TermOptions::query(json!(5)).with_range(RangeMode::Min),
        ))
        .unwrap();
    assert_eq!(execute_ids(&store, &min), vec![2, 3]);

    let max = compiler
        .compile(&QuerySpec::new().with_options(
            "position",
            TermOptions::query(json!(5)).with_range(RangeMode::Max),
        ))
        .unwrap();
    assert_eq!(execute_ids(&store, &max), vec![1, 2]);

    let between = compiler
        .compile(&QuerySpec::new().with_options(
            "position",
            TermOptions::query(json!([2, 9])).with_range(RangeMode::MinMax),
        ))
        .unwrap();
    assert_eq!(execute_ids(&store, &between), vec![2, 3]);
}

#[test]
fn test_field_not_excludes() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("draft"))]), None);
    store.seed(2, "/b", doc(&[("status", json!("published"))]), None);

    let plan = compiler()
        .compile(&QuerySpec::new().with_options(
            "status",
            TermOptions::default().with_not(json!("draft")),
        ))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![2]);
}

#[test]
fn test_date_normalization_matches_offset_variants() {
    let mut store = MemoryStore::new();
    // Stored values are canonical UTC, as the extraction layer writes them
    store.seed(
        1,
        "/a",
        doc(&[("created", json!("2024-03-01T10:00:00.000000Z"))]),
        None,
    );

    // The same instant, expressed with an offset
    let plan = compiler()
        .compile(&QuerySpec::new().with_term("created", "2024-03-01T12:00:00+02:00"))
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![1]);
}

#[test]
fn test_date_range_window_semantics() {
    let mut store = MemoryStore::new();
    store.seed(
        1,
        "/open",
        doc(&[("effective", json!("2024-01-01T00:00:00.000000Z"))]),
        None,
    );
    store.seed(
        2,
        "/window",
        doc(&[
            ("effective", json!("2024-01-01T00:00:00.000000Z")),
            ("expires", json!("2024-06-01T00:00:00.000000Z")),
        ]),
        None,
    );
    store.seed(
        3,
        "/future",
        doc(&[("effective", json!("2025-01-01T00:00:00.000000Z"))]),
        None,
    );

    let compiler = compiler();
    let mid_2024 = compiler
        .compile(&QuerySpec::new().with_term("effective_range", "2024-07-01T00:00:00Z"))
        .unwrap();
    // Doc 2's window closed in June; doc 3 is not yet effective
    assert_eq!(execute_ids(&store, &mid_2024), vec![1]);

    let spring_2024 = compiler
        .compile(&QuerySpec::new().with_term("effective_range", "2024-03-01T00:00:00Z"))
        .unwrap();
    assert_eq!(execute_ids(&store, &spring_2024), vec![1, 2]);
}

#[test]
fn test_boolean_truthy_inputs() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("published", json!(true))]), None);
    store.seed(2, "/b", doc(&[("published", json!(false))]), None);

    let compiler = compiler();
    for value in [json!(true), json!(1), json!("yes")] {
        let plan = compiler
            .compile(&QuerySpec::new().with_term("published", value))
            .unwrap();
        assert_eq!(execute_ids(&store, &plan), vec![1]);
    }
    for value in [json!(false), json!(0), json!("")] {
        let plan = compiler
            .compile(&QuerySpec::new().with_term("published", value))
            .unwrap();
        assert_eq!(execute_ids(&store, &plan), vec![2]);
    }
}

#[test]
fn test_sorting_and_direction_repetition() {
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("position", json!(2)), ("status", json!("x"))]), None);
    store.seed(2, "/b", doc(&[("position", json!(1)), ("status", json!("x"))]), None);
    store.seed(3, "/c", doc(&[("position", json!(3)), ("status", json!("x"))]), None);

    let plan = compiler()
        .compile(
            &QuerySpec::new()
                .with_term("status", "x")
                .with_sort("position", SortDirection::Descending),
        )
        .unwrap();
    assert_eq!(execute_ids(&store, &plan), vec![3, 1, 2]);
}

#[test]
fn test_unregistered_name_masks_typo_as_miss() {
    // The lenient fallback: a mistyped index name compiles and simply
    // misses, rather than erroring.
    init_tracing();
    let mut store = MemoryStore::new();
    store.seed(1, "/a", doc(&[("status", json!("draft"))]), None);

    let plan = compiler()
        .compile(&QuerySpec::new().with_term("sttaus", "draft"))
        .unwrap();
    assert!(execute_ids(&store, &plan).is_empty());
}

#[test]
fn test_metadata_name_is_not_independently_queryable() {
    // "title" is metadata: retrievable through handles, but a query on it
    // goes through the generic fallback rather than an index kind.
    let registry = standard_registry();
    assert!(registry.is_metadata("title"));
    assert!(registry.lookup("title").is_none());

    let compiler = QueryCompiler::new(registry, Arc::new(BasicRanking::new()));
    let plan = compiler
        .compile(&QuerySpec::new().with_term("title", "Hello"))
        .unwrap();
    assert_eq!(plan.predicate, "(docs.idx -> 'title') = $1");
    assert_eq!(plan.params, vec![Param::Json(json!("Hello"))]);
}
