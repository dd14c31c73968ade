//! Spreadsheet creation for new puzzles.

pub mod drive;

use async_trait::async_trait;

use crate::errors::HerringError;

pub use drive::DriveSheetService;

#[async_trait]
pub trait SheetService: Send + Sync {
    /// Create a spreadsheet titled `title` and return a link to it. The link
    /// may carry a query string.
    async fn create_spreadsheet(&self, title: &str) -> Result<String, HerringError>;
}
