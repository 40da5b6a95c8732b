use async_trait::async_trait;

use crate::application::errors::StorageError;
use crate::domain::entities::Note;

/// Store trait - abstraction for note persistence
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<Note>, StorageError>;
    async fn save(&self, note: &Note) -> Result<(), StorageError>;
    /// Returns whether something was removed
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
    async fn all(&self) -> Result<Vec<Note>, StorageError>;
}
