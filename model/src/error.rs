use std::fmt;
use std::path::PathBuf;

/// The attribute list a face index points into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Position => "position",
            ElementKind::TexCoord => "texture coordinate",
            ElementKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("line {line}: {kind} index {index} is out of range, {available} defined so far")]
    IndexOutOfRange {
        line: usize,
        kind: ElementKind,
        index: usize,
        available: usize,
    },
    #[error("line {line}: face with {vertices} vertices, only triangles are accepted")]
    UnsupportedPolygon { line: usize, vertices: usize },
    #[error("expected a .obj file, got {0:?}")]
    NotObjFile(PathBuf),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl ObjError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ObjError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// 1-based source line the error was raised on, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::MalformedRecord { line, .. }
            | ObjError::IndexOutOfRange { line, .. }
            | ObjError::UnsupportedPolygon { line, .. } => Some(*line),
            ObjError::NotObjFile(_) | ObjError::Io(_) => None,
        }
    }
}
