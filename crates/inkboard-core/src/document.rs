//! JSON codec for the committed move list.

use crate::shapes::{Move, MoveError, MoveId, MoveRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Document import/export errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("move {index} is invalid: {source}")]
    InvalidMove {
        index: usize,
        #[source]
        source: MoveError,
    },
    #[error("duplicate move id {0}")]
    DuplicateId(MoveId),
    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),
}

/// A serializable whiteboard document: the committed moves in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub version: u32,
    pub moves: Vec<Move>,
}

#[derive(Deserialize)]
struct DocumentRecord {
    #[serde(default = "default_version")]
    version: u32,
    moves: Vec<MoveRecord>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Document {
    pub fn new(moves: Vec<Move>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            moves,
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document, validating every move and id.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let record: DocumentRecord = serde_json::from_str(json)?;
        if record.version != DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(record.version));
        }

        let mut seen = HashSet::with_capacity(record.moves.len());
        let mut moves = Vec::with_capacity(record.moves.len());
        for (index, raw) in record.moves.into_iter().enumerate() {
            if !seen.insert(raw.id) {
                return Err(DocumentError::DuplicateId(raw.id));
            }
            let m = Move::try_from(raw).map_err(|source| DocumentError::InvalidMove { index, source })?;
            moves.push(m);
        }
        Ok(Self::new(moves))
    }
}
