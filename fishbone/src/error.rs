use crate::model::{NodeId, NodeKind};

#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// Only raised in strict mode; the default engine absorbs lookup misses.
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: NodeId },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("workbook has no sheets")]
    NoSheet,

    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    #[error("{what} limit exceeded: {got} > {max}")]
    LimitExceeded {
        what: &'static str,
        got: usize,
        max: usize,
    },

    #[error("read failed: {0}")]
    Read(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[cfg(feature = "xlsx")]
    #[error("xlsx write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiagramError {
    /// Stable machine-readable code for boundary envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            DiagramError::NotFound { .. } => "not_found",
            DiagramError::InvalidConfig(_) => "invalid_config",
            DiagramError::InvalidDocument(_) => "invalid_document",
            DiagramError::Import(e) => e.code(),
            DiagramError::Export(_) => "write_failed",
        }
    }

    pub(crate) fn not_found(kind: NodeKind, id: &NodeId) -> Self {
        DiagramError::NotFound {
            kind,
            id: id.clone(),
        }
    }
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::UnsupportedFormat(_) => "unsupported_format",
            ImportError::NoSheet => "no_sheet",
            ImportError::MissingColumn(_) => "missing_column",
            ImportError::LimitExceeded { .. } => "limit_exceeded",
            ImportError::Read(_) | ImportError::Io(_) => "read_failed",
        }
    }
}
