pub mod model;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod table;
pub mod geometry {
    pub mod layout;
    pub mod limits;
}
pub mod algorithms {
    pub mod picking;
}
mod json;
mod svg;
#[cfg(feature = "xlsx")]
pub mod xlsx;

pub use commands::{Command, Outcome};
pub use config::{DiagramConfig, HoverConfig};
pub use error::{DiagramError, ExportError, ImportError};
pub use geometry::layout::LayoutConfig;
pub use model::{
    Category, CategoryUpdate, Cause, DiagramState, NodeId, NodeKind, NodePath, NodeUpdate,
    Subcause,
};
pub use table::{Cell, Row};

use ids::IdGen;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Pick {
    Node { path: NodePath, dist: f32 },
    Spine { category: NodeId, dist: f32 },
}

/// State container for one fishbone diagram: the node store plus the engine
/// that mutates it. Hand it by reference to whatever needs read or dispatch access.
pub struct Diagram {
    pub(crate) state: DiagramState,
    pub(crate) config: DiagramConfig,
    pub(crate) ids: IdGen,
    pub(crate) rev: u64,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::with_config(DiagramConfig::default())
    }

    pub fn with_config(config: DiagramConfig) -> Self {
        let ids = match config.seed {
            Some(seed) => IdGen::from_seed(seed),
            None => IdGen::unseeded(),
        };
        Diagram {
            state: DiagramState::new(config.default_problem_statement.clone()),
            config,
            ids,
            rev: 1,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_config(DiagramConfig::seeded(seed))
    }

    /// Read-only projection for rendering.
    pub fn state(&self) -> &DiagramState {
        &self.state
    }
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }
    pub fn layout(&self) -> &geometry::layout::LayoutConfig {
        &self.config.layout
    }
    /// Monotonic revision; increments on every state-changing command.
    pub fn revision(&self) -> u64 {
        self.rev
    }
    pub fn node_count(&self) -> usize {
        self.state.node_count()
    }

    pub(crate) fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }

    fn changed(&mut self, cmd: Command) -> bool {
        matches!(self.apply(cmd), Ok(o) if o.changed())
    }

    fn created(&mut self, cmd: Command) -> Option<NodeId> {
        match self.apply(cmd) {
            Ok(Outcome::Created(id)) => Some(id),
            _ => None,
        }
    }

    // Command shorthands; misses report false/None in either mode
    pub fn set_problem_statement(&mut self, text: impl Into<String>) -> bool {
        self.changed(Command::SetProblemStatement { text: text.into() })
    }
    pub fn clear(&mut self) {
        let _ = self.apply(Command::ClearDiagram);
    }
    pub fn load_template(&mut self) {
        let _ = self.apply(Command::LoadTemplate);
    }
    pub fn add_category(&mut self) -> NodeId {
        self.created(Command::AddCategory).unwrap_or_default()
    }
    pub fn update_category(&mut self, id: &NodeId, updates: CategoryUpdate) -> bool {
        self.changed(Command::UpdateCategory {
            id: id.clone(),
            updates,
        })
    }
    pub fn delete_category(&mut self, id: &NodeId) -> bool {
        self.changed(Command::DeleteCategory { id: id.clone() })
    }
    pub fn add_cause(&mut self, category: &NodeId) -> Option<NodeId> {
        self.created(Command::AddCause {
            category_id: category.clone(),
        })
    }
    pub fn update_cause(&mut self, category: &NodeId, cause: &NodeId, updates: NodeUpdate) -> bool {
        self.changed(Command::UpdateCause {
            category_id: category.clone(),
            cause_id: cause.clone(),
            updates,
        })
    }
    pub fn delete_cause(&mut self, category: &NodeId, cause: &NodeId) -> bool {
        self.changed(Command::DeleteCause {
            category_id: category.clone(),
            cause_id: cause.clone(),
        })
    }
    pub fn add_subcause(&mut self, category: &NodeId, cause: &NodeId) -> Option<NodeId> {
        self.created(Command::AddSubcause {
            category_id: category.clone(),
            cause_id: cause.clone(),
        })
    }
    pub fn update_subcause(
        &mut self,
        category: &NodeId,
        cause: &NodeId,
        subcause: &NodeId,
        updates: NodeUpdate,
    ) -> bool {
        self.changed(Command::UpdateSubcause {
            category_id: category.clone(),
            cause_id: cause.clone(),
            subcause_id: subcause.clone(),
            updates,
        })
    }
    pub fn delete_subcause(&mut self, category: &NodeId, cause: &NodeId, subcause: &NodeId) -> bool {
        self.changed(Command::DeleteSubcause {
            category_id: category.clone(),
            cause_id: cause.clone(),
            subcause_id: subcause.clone(),
        })
    }
    pub fn load_state(&mut self, state: DiagramState) {
        let _ = self.apply(Command::LoadFromData(state));
    }

    // Spatial reads and writes
    pub fn node_position(&self, path: &NodePath) -> Option<(f32, f32)> {
        match path {
            NodePath::Category { category } => self.state.category(category).map(|c| (c.x, c.y)),
            NodePath::Cause { category, cause } => {
                self.state.cause(category, cause).map(|c| (c.x, c.y))
            }
            NodePath::Subcause {
                category,
                cause,
                subcause,
            } => self
                .state
                .subcause(category, cause, subcause)
                .map(|s| (s.x, s.y)),
        }
    }

    pub fn move_node(&mut self, path: &NodePath, x: f32, y: f32) -> bool {
        let cmd = match path.clone() {
            NodePath::Category { category } => Command::UpdateCategory {
                id: category,
                updates: CategoryUpdate::position(x, y),
            },
            NodePath::Cause { category, cause } => Command::UpdateCause {
                category_id: category,
                cause_id: cause,
                updates: NodeUpdate::position(x, y),
            },
            NodePath::Subcause {
                category,
                cause,
                subcause,
            } => Command::UpdateSubcause {
                category_id: category,
                cause_id: cause,
                subcause_id: subcause,
                updates: NodeUpdate::position(x, y),
            },
        };
        self.changed(cmd)
    }

    /// Stored spine point, or the positional default when none is stored.
    pub fn resolved_spine_x(&self, category: &NodeId) -> Option<f32> {
        let idx = self.state.category_index(category)?;
        let stored = self.state.categories[idx].spine_x;
        Some(self.config.layout.resolve_spine_x(stored, idx))
    }

    /// Assign a spine point; values outside the spine range are clamped.
    pub fn set_spine_x(&mut self, category: &NodeId, x: f32) -> bool {
        self.update_category(category, CategoryUpdate::spine_x(x))
    }

    // Picking
    pub fn pick(&self, x: f32, y: f32, tol: f32) -> Option<Pick> {
        algorithms::picking::pick_impl(self, x, y, tol)
    }

    // JSON
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(&self.state)
    }
    /// Validate a JSON document and replace the state with it atomically.
    pub fn from_json_value(&mut self, v: serde_json::Value) -> Result<(), DiagramError> {
        let state = json::from_json_impl(v, &mut self.ids, &self.config.layout)?;
        self.load_state(state);
        Ok(())
    }

    // Tabular interchange
    pub fn export_rows(&self) -> Vec<Row> {
        let rows = table::state_to_rows(&self.state);
        info!(rows = rows.len(), categories = self.state.categories.len(), "exported rows");
        rows
    }

    /// Rebuild the tree from rows; on error the store is left untouched.
    pub fn import_rows(&mut self, rows: &[Row]) -> Result<(), DiagramError> {
        match table::rows_to_state(rows, &mut self.ids, &self.config) {
            Ok(state) => {
                info!(rows = rows.len(), categories = state.categories.len(), "imported rows");
                self.load_state(state);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "import rejected");
                Err(e.into())
            }
        }
    }

    #[cfg(feature = "xlsx")]
    pub fn export_xlsx(&self) -> Result<Vec<u8>, DiagramError> {
        Ok(xlsx::write_xlsx(&self.export_rows())?)
    }

    #[cfg(feature = "xlsx")]
    pub fn import_xlsx_bytes(&mut self, bytes: Vec<u8>) -> Result<(), DiagramError> {
        let rows = xlsx::read_workbook_bytes(bytes).inspect_err(|e| warn!(error = %e, "import rejected"))?;
        self.import_rows(&rows)
    }

    #[cfg(feature = "xlsx")]
    pub fn import_path(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), DiagramError> {
        let rows = xlsx::read_workbook_path(path.as_ref())
            .inspect_err(|e| warn!(error = %e, "import rejected"))?;
        self.import_rows(&rows)
    }

    #[cfg(feature = "xlsx")]
    pub fn export_path(&self, path: impl AsRef<std::path::Path>) -> Result<(), DiagramError> {
        let bytes = self.export_xlsx()?;
        std::fs::write(path, bytes).map_err(ExportError::from)?;
        Ok(())
    }

    // SVG
    pub fn to_svg_paths(&self) -> Vec<String> {
        svg::to_svg_paths_impl(&self.state, &self.config.layout)
    }
    pub fn to_svg_document(&self) -> String {
        svg::to_svg_document_impl(&self.state, &self.config.layout)
    }
}
