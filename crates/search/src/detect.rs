//! Ranking-backend auto-detection
//!
//! Runs once at startup. Detection failure is never raised to the
//! caller: full-text search falls back to the baseline backend and the
//! failure is logged.

use crate::{BasicRanking, RankingBackend, TextSearchRanking};
use cairn_core::StoreProbe;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pick the ranking backend for a store
///
/// Probes the store for the enhanced text-search capability. Any probe
/// error — connectivity, permissions, an old server — selects the
/// baseline backend transparently.
pub fn detect_backend(probe: &dyn StoreProbe) -> Arc<dyn RankingBackend> {
    match probe.supports_text_search() {
        Ok(true) => {
            info!(backend = "text_search", "enhanced ranking backend detected");
            Arc::new(TextSearchRanking::new())
        }
        Ok(false) => {
            debug!(backend = "basic", "text-search capability absent; using baseline");
            Arc::new(BasicRanking::new())
        }
        Err(e) => {
            warn!(error = %e, backend = "basic", "ranking detection failed; falling back to baseline");
            Arc::new(BasicRanking::new())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
