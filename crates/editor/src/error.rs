use scriptide_primitives::DocumentId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
	#[error("unknown document {0}")]
	UnknownDocument(DocumentId),
}

pub type Result<T> = std::result::Result<T, EditorError>;
