use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

// ============== Timestamp Helpers ==============

/// RFC3339 timestamp in UTC (for logs/telemetry).
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

// ============== Timezone Normalization ==============

/// Normalize an offset-aware datetime to UTC.
pub fn to_utc(date: DateTime<FixedOffset>) -> DateTime<Utc> {
    date.with_timezone(&Utc)
}

/// Interpret a naive datetime as already being in UTC.
///
/// Callers that get offset-less timestamps from the platform use this rather
/// than guessing a local zone.
pub fn assume_utc(date: NaiveDateTime) -> DateTime<Utc> {
    date.and_utc()
}
