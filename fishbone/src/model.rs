use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque node identifier, unique across every level of a diagram.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Category,
    Cause,
    Subcause,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Category => "category",
            NodeKind::Cause => "cause",
            NodeKind::Subcause => "subcause",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcause {
    #[serde(default)]
    pub id: NodeId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    #[serde(default)]
    pub id: NodeId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub subcauses: Vec<Subcause>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: NodeId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    // None resolves through LayoutConfig::default_spine_x at read time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spine_x: Option<f32>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub causes: Vec<Cause>,
}

impl Category {
    pub fn cause(&self, id: &NodeId) -> Option<&Cause> {
        self.causes.iter().find(|c| &c.id == id)
    }
    pub fn cause_mut(&mut self, id: &NodeId) -> Option<&mut Cause> {
        self.causes.iter_mut().find(|c| &c.id == id)
    }
    /// Number of entities in this subtree, the category itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.causes.iter().map(Cause::subtree_len).sum::<usize>()
    }
}

impl Cause {
    pub fn subcause(&self, id: &NodeId) -> Option<&Subcause> {
        self.subcauses.iter().find(|s| &s.id == id)
    }
    pub fn subcause_mut(&mut self, id: &NodeId) -> Option<&mut Subcause> {
        self.subcauses.iter_mut().find(|s| &s.id == id)
    }
    pub fn subtree_len(&self) -> usize {
        1 + self.subcauses.len()
    }
}

/// Aggregate root: the problem statement plus the ordered category tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl DiagramState {
    pub fn new(problem_statement: impl Into<String>) -> Self {
        DiagramState {
            problem_statement: problem_statement.into(),
            categories: Vec::new(),
        }
    }

    pub fn category(&self, id: &NodeId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }
    pub fn category_mut(&mut self, id: &NodeId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| &c.id == id)
    }
    pub fn category_index(&self, id: &NodeId) -> Option<usize> {
        self.categories.iter().position(|c| &c.id == id)
    }
    pub fn cause(&self, category: &NodeId, cause: &NodeId) -> Option<&Cause> {
        self.category(category)?.cause(cause)
    }
    pub fn subcause(&self, category: &NodeId, cause: &NodeId, sub: &NodeId) -> Option<&Subcause> {
        self.cause(category, cause)?.subcause(sub)
    }

    /// Total entity count over all three levels.
    pub fn node_count(&self) -> usize {
        self.categories.iter().map(Category::subtree_len).sum()
    }

    /// Every id in document order: category, its causes, each cause's subcauses.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.categories.iter().flat_map(|cat| {
            std::iter::once(&cat.id).chain(cat.causes.iter().flat_map(|cause| {
                std::iter::once(&cause.id).chain(cause.subcauses.iter().map(|s| &s.id))
            }))
        })
    }

    pub fn contains_id(&self, id: &NodeId) -> bool {
        self.ids().any(|x| x == id)
    }

    pub fn contains_path(&self, path: &NodePath) -> bool {
        match path {
            NodePath::Category { category } => self.category(category).is_some(),
            NodePath::Cause { category, cause } => self.cause(category, cause).is_some(),
            NodePath::Subcause {
                category,
                cause,
                subcause,
            } => self.subcause(category, cause, subcause).is_some(),
        }
    }
}

/// Explicit address of a node; the hierarchy is fixed at three levels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum NodePath {
    Category {
        category: NodeId,
    },
    Cause {
        category: NodeId,
        cause: NodeId,
    },
    Subcause {
        category: NodeId,
        cause: NodeId,
        subcause: NodeId,
    },
}

impl NodePath {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePath::Category { .. } => NodeKind::Category,
            NodePath::Cause { .. } => NodeKind::Cause,
            NodePath::Subcause { .. } => NodeKind::Subcause,
        }
    }
    /// Id of the addressed node itself.
    pub fn leaf(&self) -> &NodeId {
        match self {
            NodePath::Category { category } => category,
            NodePath::Cause { cause, .. } => cause,
            NodePath::Subcause { subcause, .. } => subcause,
        }
    }
}

/// Partial update for a category; absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spine_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Partial update for a cause or subcause.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CategoryUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        CategoryUpdate {
            name: Some(name.into()),
            ..Default::default()
        }
    }
    pub fn position(x: f32, y: f32) -> Self {
        CategoryUpdate {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }
    pub fn spine_x(spine_x: f32) -> Self {
        CategoryUpdate {
            spine_x: Some(spine_x),
            ..Default::default()
        }
    }
    pub fn comment(comment: impl Into<String>) -> Self {
        CategoryUpdate {
            comment: Some(comment.into()),
            ..Default::default()
        }
    }
}

impl NodeUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        NodeUpdate {
            name: Some(name.into()),
            ..Default::default()
        }
    }
    pub fn position(x: f32, y: f32) -> Self {
        NodeUpdate {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }
    pub fn comment(comment: impl Into<String>) -> Self {
        NodeUpdate {
            comment: Some(comment.into()),
            ..Default::default()
        }
    }
}
