use crate::error::DiagramError;
use crate::geometry::layout::LayoutConfig;
use crate::geometry::limits;
use crate::ids::IdGen;
use crate::model::{Category, DiagramState, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const DOC_VERSION: u32 = 1;

pub fn to_json_impl(state: &DiagramState) -> Value {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Doc<'a> {
        version: u32,
        problem_statement: &'a str,
        categories: &'a [Category],
    }
    serde_json::to_value(Doc {
        version: DOC_VERSION,
        problem_statement: &state.problem_statement,
        categories: &state.categories,
    })
    .unwrap_or(Value::Null)
}

fn invalid(msg: impl Into<String>) -> DiagramError {
    DiagramError::InvalidDocument(msg.into())
}

fn check_coords(what: &str, name: &str, x: f32, y: f32) -> Result<(), DiagramError> {
    if limits::in_coord_bounds(x) && limits::in_coord_bounds(y) {
        Ok(())
    } else {
        Err(invalid(format!("{} '{}' has coordinates out of bounds", what, name)))
    }
}

fn check_text(s: &str) -> Result<(), DiagramError> {
    if limits::in_text_bounds(s) {
        Ok(())
    } else {
        Err(invalid("text field exceeds length cap"))
    }
}

// Keeps a supplied id unless it repeats; empty ids get a fresh one.
fn claim(id: &mut NodeId, seen: &mut HashSet<NodeId>, ids: &mut IdGen) -> Result<(), DiagramError> {
    if id.is_empty() {
        *id = ids.fresh(|c| seen.contains(c));
    } else if seen.contains(id) {
        return Err(invalid(format!("duplicate id '{}'", id)));
    }
    seen.insert(id.clone());
    Ok(())
}

/// Parse and validate a document. Nothing is applied here; the caller swaps
/// the whole state in one command once this returns.
pub fn from_json_impl(
    v: Value,
    ids: &mut IdGen,
    layout: &LayoutConfig,
) -> Result<DiagramState, DiagramError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct DocDe {
        version: Option<u32>,
        #[serde(flatten)]
        state: DiagramState,
    }
    let doc: DocDe = serde_json::from_value(v).map_err(|e| invalid(e.to_string()))?;
    if let Some(ver) = doc.version {
        if ver > DOC_VERSION {
            return Err(invalid(format!("unsupported version {}", ver)));
        }
    }
    let mut state = doc.state;
    check_text(&state.problem_statement)?;
    if state.categories.len() > limits::MAX_CATEGORIES {
        return Err(invalid(format!("categories cap exceeded: {}", state.categories.len())));
    }
    if state.node_count() > limits::MAX_NODES {
        return Err(invalid(format!("nodes cap exceeded: {}", state.node_count())));
    }

    let mut seen: HashSet<NodeId> = HashSet::new();
    for cat in state.categories.iter_mut() {
        claim(&mut cat.id, &mut seen, ids)?;
        check_text(&cat.name)?;
        check_text(&cat.comment)?;
        check_coords("category", &cat.name, cat.x, cat.y)?;
        if let Some(sx) = cat.spine_x {
            if !sx.is_finite() {
                return Err(invalid(format!("category '{}' has non-finite spineX", cat.name)));
            }
            cat.spine_x = Some(layout.clamp_spine_x(sx));
        }
        if cat.causes.len() > limits::MAX_CAUSES_PER_CATEGORY {
            return Err(invalid(format!("causes cap exceeded in '{}'", cat.name)));
        }
        for cause in cat.causes.iter_mut() {
            claim(&mut cause.id, &mut seen, ids)?;
            check_text(&cause.name)?;
            check_text(&cause.comment)?;
            check_coords("cause", &cause.name, cause.x, cause.y)?;
            if cause.subcauses.len() > limits::MAX_SUBCAUSES_PER_CAUSE {
                return Err(invalid(format!("subcauses cap exceeded in '{}'", cause.name)));
            }
            for sub in cause.subcauses.iter_mut() {
                claim(&mut sub.id, &mut seen, ids)?;
                check_text(&sub.name)?;
                check_text(&sub.comment)?;
                check_coords("subcause", &sub.name, sub.x, sub.y)?;
            }
        }
    }
    Ok(state)
}
