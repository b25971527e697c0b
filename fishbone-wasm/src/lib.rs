use fishbone::interaction::{DragSession, HoverTracker};
use fishbone::DiagramConfig;
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Diagram {
    pub(crate) inner: fishbone::Diagram,
    pub(crate) drag: Option<DragSession>,
    pub(crate) hover: HoverTracker,
}

impl Diagram {
    pub fn rs_new(mut config: DiagramConfig) -> Diagram {
        if config.seed.is_none() {
            config.seed = Some((js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
        }
        let hover = HoverTracker::new(config.hover.clone());
        Diagram { inner: fishbone::Diagram::with_config(config), drag: None, hover }
    }
    pub fn rs_revision(&self) -> u64 { self.inner.revision() }

    // Drops interaction state that points at removed nodes.
    pub(crate) fn sync_interaction(&mut self) {
        self.hover.retain(self.inner.state());
        let stale = match self.drag.as_ref().map(|s| s.target()) {
            Some(fishbone::interaction::DragTarget::Node { path }) => !self.inner.state().contains_path(path),
            Some(fishbone::interaction::DragTarget::Spine { category }) => self.inner.state().category(category).is_none(),
            None => false,
        };
        if stale { self.drag = None; }
    }
}
