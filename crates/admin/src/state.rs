//! Application state shared across handlers.

use std::sync::Arc;

use chrono::FixedOffset;

use crate::db::OrderStore;
use crate::services::AnalyticsReporter;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    store: Arc<dyn OrderStore>,
    reporter: AnalyticsReporter,
}

impl AppState {
    /// Build state over an order store, grouping chart days in
    /// `reporting_offset`.
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>, reporting_offset: FixedOffset) -> Self {
        let reporter = AnalyticsReporter::new(Arc::clone(&store), reporting_offset);
        Self::with_reporter(store, reporter)
    }

    /// Build state with a preconfigured reporter (e.g. one with a fixed clock).
    #[must_use]
    pub fn with_reporter(store: Arc<dyn OrderStore>, reporter: AnalyticsReporter) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, reporter }),
        }
    }

    /// The order store.
    #[must_use]
    pub fn store(&self) -> &dyn OrderStore {
        self.inner.store.as_ref()
    }

    /// The analytics reporter.
    #[must_use]
    pub fn reporter(&self) -> &AnalyticsReporter {
        &self.inner.reporter
    }
}
