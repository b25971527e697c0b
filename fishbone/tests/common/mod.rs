#![allow(dead_code)]

use fishbone::{DiagramState, NodeId};
use tracing_subscriber::EnvFilter;

/// Route engine events to the test writer; filter with RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Same tree with every id blanked, for comparisons across id regeneration.
pub fn without_ids(state: &DiagramState) -> DiagramState {
    let mut s = state.clone();
    for cat in s.categories.iter_mut() {
        cat.id = NodeId::default();
        for cause in cat.causes.iter_mut() {
            cause.id = NodeId::default();
            for sub in cause.subcauses.iter_mut() {
                sub.id = NodeId::default();
            }
        }
    }
    s
}

pub fn all_ids(state: &DiagramState) -> Vec<NodeId> {
    state.ids().cloned().collect()
}
