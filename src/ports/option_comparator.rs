//! Option comparator port.

use async_trait::async_trait;

use super::AIError;
use crate::domain::decision::{ComparisonResponse, UserPreferences};

/// Port for producing a scored comparison of options.
///
/// Unlike synthesis, provider failures are returned to the caller; a
/// fabricated analysis is never substituted.
#[async_trait]
pub trait OptionComparator: Send + Sync {
    /// Compares options for the given preferences.
    ///
    /// # Errors
    ///
    /// Any [`AIError`] raised by the underlying provider.
    async fn compare(&self, preferences: &UserPreferences) -> Result<ComparisonResponse, AIError>;
}
