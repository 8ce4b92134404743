use quotedesk_core::assignment::AssignmentError;
use quotedesk_core::error::CoreError;

/// Errors surfaced by repository calls that validate or guard a write.
///
/// Missing rows and stale optimistic-lock versions are reported as
/// [`CoreError::NotFound`] and [`CoreError::Conflict`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
