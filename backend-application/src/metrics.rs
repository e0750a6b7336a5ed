use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    webhooks_received: AtomicU64,
    kills_recorded: AtomicU64,
    duplicates_skipped: AtomicU64,
    events_dropped: AtomicU64,
    ingest_errors: AtomicU64,
}

impl Metrics {
    pub fn record_webhook(&self) {
        self.webhooks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_kill(&self) {
        self.kills_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn kills_recorded(&self) -> u64 {
        self.kills_recorded.load(Ordering::Relaxed)
    }

    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates_skipped.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let received = self.webhooks_received.load(Ordering::Relaxed);
        let kills = self.kills_recorded.load(Ordering::Relaxed);
        let duplicates = self.duplicates_skipped.load(Ordering::Relaxed);
        let dropped = self.events_dropped.load(Ordering::Relaxed);
        let errors = self.ingest_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE killboard_webhooks_received_total counter\n\
killboard_webhooks_received_total {}\n\
# TYPE killboard_kills_recorded_total counter\n\
killboard_kills_recorded_total {}\n\
# TYPE killboard_duplicates_skipped_total counter\n\
killboard_duplicates_skipped_total {}\n\
# TYPE killboard_events_dropped_total counter\n\
killboard_events_dropped_total {}\n\
# TYPE killboard_ingest_errors_total counter\n\
killboard_ingest_errors_total {}\n",
            received, kills, duplicates, dropped, errors
        )
    }
}
