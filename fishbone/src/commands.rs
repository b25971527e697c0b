use crate::error::DiagramError;
use crate::geometry::limits;
use crate::model::{
    Category, CategoryUpdate, Cause, DiagramState, NodeId, NodeKind, NodeUpdate, Subcause,
};
use crate::Diagram;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

pub const TEMPLATE_CATEGORIES: [&str; 6] = [
    "People",
    "Process",
    "Materials",
    "Machines",
    "Measurements",
    "Environment",
];

pub const NEW_CATEGORY_NAME: &str = "New Category";
pub const NEW_CAUSE_NAME: &str = "New Cause";
pub const NEW_SUBCAUSE_NAME: &str = "New Subcause";

/// The closed command set accepted by the engine.
///
/// Wire shape: `{ "type": "ADD_CAUSE", "payload": { "categoryId": "..." } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    SetProblemStatement {
        text: String,
    },
    ClearDiagram,
    LoadTemplate,
    AddCategory,
    UpdateCategory {
        id: NodeId,
        #[serde(default)]
        updates: CategoryUpdate,
    },
    DeleteCategory {
        id: NodeId,
    },
    AddCause {
        category_id: NodeId,
    },
    UpdateCause {
        category_id: NodeId,
        cause_id: NodeId,
        #[serde(default)]
        updates: NodeUpdate,
    },
    DeleteCause {
        category_id: NodeId,
        cause_id: NodeId,
    },
    AddSubcause {
        category_id: NodeId,
        cause_id: NodeId,
    },
    UpdateSubcause {
        category_id: NodeId,
        cause_id: NodeId,
        subcause_id: NodeId,
        #[serde(default)]
        updates: NodeUpdate,
    },
    DeleteSubcause {
        category_id: NodeId,
        cause_id: NodeId,
        subcause_id: NodeId,
    },
    LoadFromData(DiagramState),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetProblemStatement { .. } => "SET_PROBLEM_STATEMENT",
            Command::ClearDiagram => "CLEAR_DIAGRAM",
            Command::LoadTemplate => "LOAD_TEMPLATE",
            Command::AddCategory => "ADD_CATEGORY",
            Command::UpdateCategory { .. } => "UPDATE_CATEGORY",
            Command::DeleteCategory { .. } => "DELETE_CATEGORY",
            Command::AddCause { .. } => "ADD_CAUSE",
            Command::UpdateCause { .. } => "UPDATE_CAUSE",
            Command::DeleteCause { .. } => "DELETE_CAUSE",
            Command::AddSubcause { .. } => "ADD_SUBCAUSE",
            Command::UpdateSubcause { .. } => "UPDATE_SUBCAUSE",
            Command::DeleteSubcause { .. } => "DELETE_SUBCAUSE",
            Command::LoadFromData(_) => "LOAD_FROM_DATA",
        }
    }
}

/// What a command did to the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Outcome {
    Unchanged,
    Updated,
    Created(NodeId),
    /// Number of entities removed, subtree included.
    Removed(usize),
    Replaced,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }
    pub fn created(&self) -> Option<&NodeId> {
        match self {
            Outcome::Created(id) => Some(id),
            _ => None,
        }
    }
}

fn miss(strict: bool, kind: NodeKind, id: &NodeId) -> Result<Outcome, DiagramError> {
    if strict {
        Err(DiagramError::not_found(kind, id))
    } else {
        Ok(Outcome::Unchanged)
    }
}

fn merge_text(slot: &mut String, v: Option<String>) -> bool {
    match v {
        Some(v) if *slot != v => {
            *slot = v;
            true
        }
        _ => false,
    }
}

// Non-finite or out-of-bounds coordinates are dropped field by field.
fn merge_coord(slot: &mut f32, v: Option<f32>) -> bool {
    match v {
        Some(v) if limits::in_coord_bounds(v) && *slot != v => {
            *slot = v;
            true
        }
        Some(v) if !limits::in_coord_bounds(v) => {
            debug!(value = v, "ignoring out-of-bounds coordinate");
            false
        }
        _ => false,
    }
}

fn merge_node(name: &mut String, x: &mut f32, y: &mut f32, comment: &mut String, u: NodeUpdate) -> bool {
    let a = merge_text(name, u.name);
    let b = merge_coord(x, u.x);
    let c = merge_coord(y, u.y);
    let d = merge_text(comment, u.comment);
    a | b | c | d
}

impl Diagram {
    /// Apply one command. Lookup misses are absorbed unless the store is strict;
    /// nothing is mutated and the revision is untouched on a miss.
    pub fn apply(&mut self, cmd: Command) -> Result<Outcome, DiagramError> {
        let name = cmd.name();
        let res = self.apply_inner(cmd);
        match &res {
            Ok(Outcome::Unchanged) => trace!(command = name, "no-op"),
            Ok(outcome) => {
                self.bump();
                debug!(command = name, ?outcome, rev = self.rev, "applied");
            }
            Err(e) => warn!(command = name, error = %e, "rejected"),
        }
        res
    }

    fn apply_inner(&mut self, cmd: Command) -> Result<Outcome, DiagramError> {
        let strict = self.config.strict;
        match cmd {
            Command::SetProblemStatement { text } => {
                if merge_text(&mut self.state.problem_statement, Some(text)) {
                    Ok(Outcome::Updated)
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            Command::ClearDiagram => {
                let empty = DiagramState::new(self.config.default_problem_statement.clone());
                if self.state == empty {
                    return Ok(Outcome::Unchanged);
                }
                self.state = empty;
                Ok(Outcome::Replaced)
            }
            Command::LoadTemplate => {
                let layout = &self.config.layout;
                let mut categories: Vec<Category> = Vec::with_capacity(TEMPLATE_CATEGORIES.len());
                for (i, name) in TEMPLATE_CATEGORIES.iter().enumerate() {
                    let id = self.ids.fresh(|id| categories.iter().any(|c| &c.id == id));
                    let (x, y) = layout.template_position(i);
                    categories.push(Category {
                        id,
                        name: name.to_string(),
                        x,
                        y,
                        spine_x: Some(layout.default_spine_x(i)),
                        comment: String::new(),
                        causes: Vec::new(),
                    });
                }
                self.state.categories = categories;
                Ok(Outcome::Replaced)
            }
            Command::AddCategory => {
                let layout = &self.config.layout;
                let index = self.state.categories.len();
                let (x, y) = layout.random_category_position(self.ids.rng());
                let id = self.ids.fresh(|id| self.state.contains_id(id));
                self.state.categories.push(Category {
                    id: id.clone(),
                    name: NEW_CATEGORY_NAME.to_string(),
                    x,
                    y,
                    spine_x: Some(layout.default_spine_x(index)),
                    comment: String::new(),
                    causes: Vec::new(),
                });
                Ok(Outcome::Created(id))
            }
            Command::UpdateCategory { id, updates } => {
                let layout = &self.config.layout;
                let Some(cat) = self.state.category_mut(&id) else {
                    return miss(strict, NodeKind::Category, &id);
                };
                let a = merge_text(&mut cat.name, updates.name);
                let b = merge_coord(&mut cat.x, updates.x);
                let c = merge_coord(&mut cat.y, updates.y);
                let d = merge_text(&mut cat.comment, updates.comment);
                let mut e = false;
                if let Some(sx) = updates.spine_x.filter(|v| v.is_finite()) {
                    let sx = layout.clamp_spine_x(sx);
                    if cat.spine_x != Some(sx) {
                        cat.spine_x = Some(sx);
                        e = true;
                    }
                }
                Ok(if a | b | c | d | e { Outcome::Updated } else { Outcome::Unchanged })
            }
            Command::DeleteCategory { id } => {
                let Some(idx) = self.state.category_index(&id) else {
                    return miss(strict, NodeKind::Category, &id);
                };
                let removed = self.state.categories.remove(idx);
                Ok(Outcome::Removed(removed.subtree_len()))
            }
            Command::AddCause { category_id } => {
                let Some(idx) = self.state.category_index(&category_id) else {
                    return miss(strict, NodeKind::Category, &category_id);
                };
                let parent = (self.state.categories[idx].x, self.state.categories[idx].y);
                let (x, y) = self.config.layout.random_cause_position(self.ids.rng(), parent);
                let id = self.ids.fresh(|id| self.state.contains_id(id));
                self.state.categories[idx].causes.push(Cause {
                    id: id.clone(),
                    name: NEW_CAUSE_NAME.to_string(),
                    x,
                    y,
                    comment: String::new(),
                    subcauses: Vec::new(),
                });
                Ok(Outcome::Created(id))
            }
            Command::UpdateCause {
                category_id,
                cause_id,
                updates,
            } => {
                let Some(cat) = self.state.category_mut(&category_id) else {
                    return miss(strict, NodeKind::Category, &category_id);
                };
                let Some(cause) = cat.cause_mut(&cause_id) else {
                    return miss(strict, NodeKind::Cause, &cause_id);
                };
                let changed = merge_node(
                    &mut cause.name,
                    &mut cause.x,
                    &mut cause.y,
                    &mut cause.comment,
                    updates,
                );
                Ok(if changed { Outcome::Updated } else { Outcome::Unchanged })
            }
            Command::DeleteCause {
                category_id,
                cause_id,
            } => {
                let Some(cat) = self.state.category_mut(&category_id) else {
                    return miss(strict, NodeKind::Category, &category_id);
                };
                let Some(idx) = cat.causes.iter().position(|c| c.id == cause_id) else {
                    return miss(strict, NodeKind::Cause, &cause_id);
                };
                let removed = cat.causes.remove(idx);
                Ok(Outcome::Removed(removed.subtree_len()))
            }
            Command::AddSubcause {
                category_id,
                cause_id,
            } => {
                let parent = match self.state.category(&category_id) {
                    None => return miss(strict, NodeKind::Category, &category_id),
                    Some(cat) => match cat.cause(&cause_id) {
                        None => return miss(strict, NodeKind::Cause, &cause_id),
                        Some(cause) => (cause.x, cause.y),
                    },
                };
                let (x, y) = self.config.layout.random_subcause_position(self.ids.rng(), parent);
                let id = self.ids.fresh(|id| self.state.contains_id(id));
                if let Some(cause) = self
                    .state
                    .category_mut(&category_id)
                    .and_then(|cat| cat.cause_mut(&cause_id))
                {
                    cause.subcauses.push(Subcause {
                        id: id.clone(),
                        name: NEW_SUBCAUSE_NAME.to_string(),
                        x,
                        y,
                        comment: String::new(),
                    });
                }
                Ok(Outcome::Created(id))
            }
            Command::UpdateSubcause {
                category_id,
                cause_id,
                subcause_id,
                updates,
            } => {
                let Some(cat) = self.state.category_mut(&category_id) else {
                    return miss(strict, NodeKind::Category, &category_id);
                };
                let Some(cause) = cat.cause_mut(&cause_id) else {
                    return miss(strict, NodeKind::Cause, &cause_id);
                };
                let Some(sub) = cause.subcause_mut(&subcause_id) else {
                    return miss(strict, NodeKind::Subcause, &subcause_id);
                };
                let changed = merge_node(&mut sub.name, &mut sub.x, &mut sub.y, &mut sub.comment, updates);
                Ok(if changed { Outcome::Updated } else { Outcome::Unchanged })
            }
            Command::DeleteSubcause {
                category_id,
                cause_id,
                subcause_id,
            } => {
                let Some(cat) = self.state.category_mut(&category_id) else {
                    return miss(strict, NodeKind::Category, &category_id);
                };
                let Some(cause) = cat.cause_mut(&cause_id) else {
                    return miss(strict, NodeKind::Cause, &cause_id);
                };
                let Some(idx) = cause.subcauses.iter().position(|s| s.id == subcause_id) else {
                    return miss(strict, NodeKind::Subcause, &subcause_id);
                };
                cause.subcauses.remove(idx);
                Ok(Outcome::Removed(1))
            }
            // Payload is trusted to already hold unique ids.
            Command::LoadFromData(state) => {
                self.state = state;
                Ok(Outcome::Replaced)
            }
        }
    }
}
