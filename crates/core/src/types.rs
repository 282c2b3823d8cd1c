/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Raw option values as stored on a widget row, keyed by option name.
pub type OptionMap = serde_json::Map<String, serde_json::Value>;
