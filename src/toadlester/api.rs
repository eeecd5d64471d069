//! Trait seam between the reconciler and the ToadLester transport.

use async_trait::async_trait;

use crate::error::Result;

use super::types::Setting;

/// The two remote primitives the reconciler is built on.
///
/// The service has no create/update/delete verbs: its only stateful call is
/// reseeding a generator, and its only read is fetching a series.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesApi: Send + Sync {
    /// Reseeds the named generator to start from `setting.value`.
    ///
    /// Returns the raw response body.
    async fn reseed(&self, setting: &Setting) -> Result<String>;

    /// Reads the series for the setting's generator type and algorithm.
    ///
    /// Returns the raw response body.
    async fn read_series(&self, setting: &Setting) -> Result<String>;

    /// Base endpoint the API talks to.
    fn endpoint(&self) -> String;
}
