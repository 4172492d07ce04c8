//! Namespaced identifiers of search documents

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FOLDER_PREFIX: &str = "FOLDER-";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unrecognized document id: {0}")]
pub struct DocumentIdError(pub String);

/// Identifies a document in the shared search index. The prefix keeps ids of
/// different record kinds from colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentId {
    Folder(i64),
}

impl DocumentId {
    pub fn folder(folder_id: i64) -> Self {
        Self::Folder(folder_id)
    }

    /// Id of the relational record the document was built from.
    pub fn record_id(&self) -> i64 {
        match self {
            Self::Folder(id) => *id,
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder(id) => write!(f, "{}{}", FOLDER_PREFIX, id),
        }
    }
}

impl FromStr for DocumentId {
    type Err = DocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(FOLDER_PREFIX)
            .and_then(|id| id.parse().ok())
            .map(Self::Folder)
            .ok_or_else(|| DocumentIdError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_ids_are_namespaced() {
        let id = DocumentId::folder(42);
        assert_eq!(id.to_string(), "FOLDER-42");
        assert_eq!("FOLDER-42".parse::<DocumentId>(), Ok(id));
        assert_eq!(id.record_id(), 42);

        assert!("ADDRESS-42".parse::<DocumentId>().is_err());
        assert!("FOLDER-".parse::<DocumentId>().is_err());
    }
}
