use async_trait::async_trait;
use super::error::ImportError;
use super::parser::RowSet;

/// A remote hierarchical store that can replace the whole collection under a key.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Overwrite everything at `key` with `rows` in a single write.
    /// On error the previous content at `key` must be left as it was.
    async fn set(&self, key: &str, rows: &RowSet) -> Result<(), ImportError>;
}
