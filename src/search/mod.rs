pub mod index;
pub mod indexer;
pub mod keys;
pub mod searcher;

pub use index::{FieldQuery, FolderDocument, FolderIndex, SearchHit};
pub use indexer::FolderIndexer;
pub use keys::DocumentId;
pub use searcher::FolderSearcher;
