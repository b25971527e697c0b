//! Flat row interchange: one row per node, plus a sentinel row for the
//! problem statement. Columns are `Category, Cause, Subcause, Comments, X, Y, SpineX`.

use crate::config::DiagramConfig;
use crate::error::ImportError;
use crate::geometry::limits;
use crate::ids::IdGen;
use crate::model::{Category, Cause, DiagramState, NodeId, Subcause};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Category-column marker of the problem statement row.
pub const PROBLEM_STATEMENT_MARKER: &str = "PROBLEM STATEMENT";

pub const HEADERS: [&str; 7] = ["Category", "Cause", "Subcause", "Comments", "X", "Y", "SpineX"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn num(v: f32) -> Cell {
        Cell::Number(v as f64)
    }

    /// Numeric value if the cell holds a usable coordinate.
    pub fn as_coord(&self) -> Option<f32> {
        let v = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        let v = v as f32;
        limits::in_coord_bounds(v).then_some(v)
    }

    /// Coordinates that fail to parse import as 0.
    pub fn coord_or_zero(&self) -> f32 {
        self.as_coord().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Cause", default)]
    pub cause: String,
    #[serde(rename = "Subcause", default)]
    pub subcause: String,
    #[serde(rename = "Comments", default)]
    pub comments: String,
    #[serde(rename = "X", default)]
    pub x: Cell,
    #[serde(rename = "Y", default)]
    pub y: Cell,
    #[serde(rename = "SpineX", default)]
    pub spine_x: Cell,
}

impl Row {
    fn node(category: &str, cause: &str, subcause: &str, comments: &str, x: f32, y: f32) -> Row {
        Row {
            category: category.to_string(),
            cause: cause.to_string(),
            subcause: subcause.to_string(),
            comments: comments.to_string(),
            x: Cell::num(x),
            y: Cell::num(y),
            spine_x: Cell::Empty,
        }
    }

    pub fn is_problem_statement(&self) -> bool {
        self.category == PROBLEM_STATEMENT_MARKER
    }
}

fn non_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

pub fn state_to_rows(state: &DiagramState) -> Vec<Row> {
    let mut rows = Vec::with_capacity(1 + state.node_count());
    rows.push(Row::node(
        PROBLEM_STATEMENT_MARKER,
        &state.problem_statement,
        "",
        "",
        0.0,
        0.0,
    ));
    for cat in &state.categories {
        let mut row = Row::node(&cat.name, "", "", &cat.comment, cat.x, cat.y);
        if let Some(sx) = cat.spine_x {
            row.spine_x = Cell::num(sx);
        }
        rows.push(row);
        for cause in &cat.causes {
            rows.push(Row::node(&cat.name, &cause.name, "", &cause.comment, cause.x, cause.y));
            for sub in &cause.subcauses {
                rows.push(Row::node(&cat.name, &cause.name, &sub.name, &sub.comment, sub.x, sub.y));
            }
        }
    }
    rows
}

fn check_cap(what: &'static str, got: usize, max: usize) -> Result<(), ImportError> {
    if got > max {
        Err(ImportError::LimitExceeded { what, got, max })
    } else {
        Ok(())
    }
}

/// Inverse of [`state_to_rows`], tolerant of row order and partial data.
///
/// A category (or cause) first seen through a child row takes that row's
/// coordinates until its own row turns up. Causes are matched by exact name
/// within their category, so duplicate cause names collapse; subcauses are
/// never merged.
pub fn rows_to_state(
    rows: &[Row],
    ids: &mut IdGen,
    config: &DiagramConfig,
) -> Result<DiagramState, ImportError> {
    check_cap("rows", rows.len(), limits::MAX_ROWS)?;
    for r in rows {
        for text in [&r.category, &r.cause, &r.subcause, &r.comments] {
            if !limits::in_text_bounds(text) {
                return Err(ImportError::LimitExceeded {
                    what: "cell text",
                    got: text.chars().count(),
                    max: limits::MAX_TEXT_LEN,
                });
            }
        }
    }

    let layout = &config.layout;
    let mut problem: Option<String> = None;
    let mut categories: Vec<Category> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<NodeId> = HashSet::new();
    // Nodes whose position so far comes from a child row
    let mut provisional_cats: HashSet<usize> = HashSet::new();
    let mut provisional_causes: HashSet<(usize, usize)> = HashSet::new();
    let mut fresh = || {
        let id = ids.fresh(|id| taken.contains(id));
        taken.insert(id.clone());
        id
    };

    for r in rows {
        if r.is_problem_statement() {
            problem = Some(r.cause.clone());
            continue;
        }
        if !non_blank(&r.category) {
            continue;
        }
        let (x, y) = (r.x.coord_or_zero(), r.y.coord_or_zero());
        let has_cause = non_blank(&r.cause);
        let has_sub = has_cause && non_blank(&r.subcause);

        let ci = match by_name.get(r.category.as_str()) {
            Some(&i) => i,
            None => {
                check_cap("categories", categories.len() + 1, limits::MAX_CATEGORIES)?;
                categories.push(Category {
                    id: fresh(),
                    name: r.category.clone(),
                    x,
                    y,
                    spine_x: r.spine_x.as_coord().map(|v| layout.clamp_spine_x(v)),
                    comment: String::new(),
                    causes: Vec::new(),
                });
                by_name.insert(r.category.as_str(), categories.len() - 1);
                if has_cause {
                    provisional_cats.insert(categories.len() - 1);
                }
                categories.len() - 1
            }
        };
        let cat = &mut categories[ci];

        if !has_cause {
            if provisional_cats.remove(&ci) {
                cat.x = x;
                cat.y = y;
                if let Some(sx) = r.spine_x.as_coord() {
                    cat.spine_x = Some(layout.clamp_spine_x(sx));
                }
            }
            if cat.comment.is_empty() && !r.comments.is_empty() {
                cat.comment = r.comments.clone();
            }
            continue;
        }

        let pi = match cat.causes.iter().position(|c| c.name == r.cause) {
            Some(i) => i,
            None => {
                check_cap("causes", cat.causes.len() + 1, limits::MAX_CAUSES_PER_CATEGORY)?;
                cat.causes.push(Cause {
                    id: fresh(),
                    name: r.cause.clone(),
                    x,
                    y,
                    comment: String::new(),
                    subcauses: Vec::new(),
                });
                if has_sub {
                    provisional_causes.insert((ci, cat.causes.len() - 1));
                }
                cat.causes.len() - 1
            }
        };
        let cause = &mut cat.causes[pi];

        if has_sub {
            check_cap("subcauses", cause.subcauses.len() + 1, limits::MAX_SUBCAUSES_PER_CAUSE)?;
            cause.subcauses.push(Subcause {
                id: fresh(),
                name: r.subcause.clone(),
                x,
                y,
                comment: r.comments.clone(),
            });
        } else {
            if provisional_causes.remove(&(ci, pi)) {
                cause.x = x;
                cause.y = y;
            }
            if cause.comment.is_empty() && !r.comments.is_empty() {
                cause.comment = r.comments.clone();
            }
        }
    }

    let state = DiagramState {
        problem_statement: problem.unwrap_or_else(|| config.default_problem_statement.clone()),
        categories,
    };
    check_cap("nodes", state.node_count(), limits::MAX_NODES)?;
    Ok(state)
}
