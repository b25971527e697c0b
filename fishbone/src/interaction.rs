//! Pointer-driven editing state that lives outside the node store: drag
//! sessions and the hover toolbar state machine.

use crate::config::HoverConfig;
use crate::model::{NodeId, NodePath};
use crate::{Diagram, DiagramState};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DragTarget {
    /// Free 2D move of a node.
    Node { path: NodePath },
    /// Horizontal-only move of a category's spine attachment point.
    Spine { category: NodeId },
}

/// One drag gesture. Every `update` is a committed position; ending the drag
/// is dropping the session.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    target: DragTarget,
    offset_x: f32,
    offset_y: f32,
}

impl DragSession {
    /// Capture the pointer-to-node offset; None if the target does not exist.
    pub fn start(diagram: &Diagram, target: DragTarget, px: f32, py: f32) -> Option<Self> {
        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        let (offset_x, offset_y) = match &target {
            DragTarget::Node { path } => {
                let (x, y) = diagram.node_position(path)?;
                (x - px, y - py)
            }
            DragTarget::Spine { category } => (diagram.resolved_spine_x(category)? - px, 0.0),
        };
        Some(DragSession {
            target,
            offset_x,
            offset_y,
        })
    }

    pub fn target(&self) -> &DragTarget {
        &self.target
    }

    /// Move the target under the pointer. Returns true if the store changed.
    pub fn update(&self, diagram: &mut Diagram, px: f32, py: f32) -> bool {
        if !px.is_finite() || !py.is_finite() {
            return false;
        }
        match &self.target {
            DragTarget::Node { path } => {
                diagram.move_node(path, px + self.offset_x, py + self.offset_y)
            }
            DragTarget::Spine { category } => diagram.set_spine_x(category, px + self.offset_x),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HoverState {
    #[default]
    Idle,
    Hovering { path: NodePath },
    PendingHide { path: NodePath, deadline_ms: f64 },
}

/// Keeps the contextual toolbar for a node open while the pointer travels
/// between the node and the toolbar. Time is supplied by the caller.
#[derive(Clone, Debug, Default)]
pub struct HoverTracker {
    state: HoverState,
    config: HoverConfig,
}

impl HoverTracker {
    pub fn new(config: HoverConfig) -> Self {
        HoverTracker {
            state: HoverState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    /// Node whose toolbar is showing, pending hide included.
    pub fn active(&self) -> Option<&NodePath> {
        match &self.state {
            HoverState::Idle => None,
            HoverState::Hovering { path } | HoverState::PendingHide { path, .. } => Some(path),
        }
    }

    pub fn enter_node(&mut self, path: NodePath) {
        self.state = HoverState::Hovering { path };
    }

    pub fn leave_node(&mut self, now_ms: f64) {
        self.schedule_hide(now_ms + self.config.node_grace_ms);
    }

    /// Reaching the toolbar cancels a pending hide.
    pub fn enter_toolbar(&mut self) {
        if let HoverState::PendingHide { path, .. } = &self.state {
            self.state = HoverState::Hovering { path: path.clone() };
        }
    }

    pub fn leave_toolbar(&mut self, now_ms: f64) {
        self.schedule_hide(now_ms + self.config.toolbar_grace_ms);
    }

    fn schedule_hide(&mut self, deadline_ms: f64) {
        if let HoverState::Hovering { path } = &self.state {
            self.state = HoverState::PendingHide {
                path: path.clone(),
                deadline_ms,
            };
        }
    }

    /// Fire an expired hide timer.
    pub fn tick(&mut self, now_ms: f64) -> &HoverState {
        if let HoverState::PendingHide { deadline_ms, .. } = self.state {
            if now_ms >= deadline_ms {
                self.state = HoverState::Idle;
            }
        }
        &self.state
    }

    /// Drop the hover if its node no longer exists.
    pub fn retain(&mut self, state: &DiagramState) {
        if self.active().is_some_and(|p| !state.contains_path(p)) {
            self.state = HoverState::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.state = HoverState::Idle;
    }
}
