//! Shared fixtures for the integration suite

use cairndb::search::BasicRanking;
use cairndb::{
    ContentPath, FullEntry, IndexDefinition, IndexDocument, IndexKind, IndexName, IndexRegistry,
    QueryCompiler,
};
use serde_json::Value;
use std::sync::{Arc, Once};

/// Install a subscriber once so degradation warnings surface under
/// `--nocapture`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn name(s: &str) -> IndexName {
    IndexName::new(s).unwrap()
}

/// A registry covering every built-in index kind
pub fn standard_registry() -> Arc<IndexRegistry> {
    let registry = IndexRegistry::new();
    registry
        .register(IndexDefinition::new(name("status"), IndexKind::Field))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("position"), IndexKind::Field))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("tags"), IndexKind::Keyword))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("created"), IndexKind::Date))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("published"), IndexKind::Boolean))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("uid"), IndexKind::Uuid))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("path"), IndexKind::Path))
        .unwrap();
    registry
        .register(IndexDefinition::new(name("text"), IndexKind::FullText))
        .unwrap();
    registry
        .register(
            IndexDefinition::new(name("effective_range"), IndexKind::DateRange)
                .with_source_attrs(vec![name("effective"), name("expires")]),
        )
        .unwrap();
    registry.add_metadata("title").unwrap();
    Arc::new(registry)
}

pub fn compiler() -> QueryCompiler {
    QueryCompiler::new(standard_registry(), Arc::new(BasicRanking::new()))
}

pub fn doc(pairs: &[(&str, Value)]) -> IndexDocument {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn entry(path: &str, pairs: &[(&str, Value)]) -> FullEntry {
    FullEntry::new(ContentPath::new(path).unwrap(), doc(pairs), None)
}
