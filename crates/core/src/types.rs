/// History record identifiers are UUID v7 (time-ordered, globally unique).
pub type RecordId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
