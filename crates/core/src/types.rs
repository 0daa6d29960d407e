/// Alert identifiers are server-side database ids.
pub type AlertId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
