use std::sync::Arc;

use tracing::{error, warn};

use crate::store::Store;
use crate::types::{ErrorLogEntry, IngestError, Source};

const MAX_MESSAGE_LEN: usize = 1000;
const MAX_TRACE_LEN: usize = 5000;

/// Per-source health state machine.
///
/// Success resets the failure counter; failure appends to the error log,
/// increments the counter, and deactivates the source once the threshold is
/// reached. The three failure writes are independent statements, not a
/// transaction; a crash between them is repaired on the next run, which
/// re-evaluates the threshold.
pub struct HealthTracker {
    store: Arc<dyn Store>,
    failure_threshold: i32,
}

impl HealthTracker {
    pub fn new(store: Arc<dyn Store>, failure_threshold: i32) -> Self {
        Self {
            store,
            failure_threshold,
        }
    }

    pub async fn record_success(&self, source: &Source) {
        if let Err(e) = self.store.record_success(source.id).await {
            error!(source_id = %source.id, error = %e, "failed to record source success");
        }
    }

    /// Failure path. A write failure in here is logged and never escapes:
    /// health bookkeeping must not take down the run it is reporting on.
    pub async fn record_failure(&self, source: &Source, err: &IngestError) {
        let message = truncate(&err.to_string(), MAX_MESSAGE_LEN);

        let entry = ErrorLogEntry {
            source_id: source.id,
            rss_url: source.rss_url.clone(),
            error_type: err.kind().to_string(),
            error_message: message.clone(),
            stack_trace: truncate(&format!("{err:?}"), MAX_TRACE_LEN),
        };
        if let Err(e) = self.store.log_error(&entry).await {
            error!(source_id = %source.id, error = %e, "failed to append error log");
        }

        if let Err(e) = self.store.record_failure(source.id, &message).await {
            error!(source_id = %source.id, error = %e, "failed to record source failure");
        }

        match self
            .store
            .deactivate_exhausted(source.id, self.failure_threshold)
            .await
        {
            Ok(true) => {
                warn!(
                    source_id = %source.id,
                    threshold = self.failure_threshold,
                    "source reached the failure threshold and was deactivated"
                );
            }
            Ok(false) => {}
            Err(e) => {
                error!(source_id = %source.id, error = %e, "failed to apply source deactivation");
            }
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
