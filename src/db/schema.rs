/// Schema for the key-value table backing local storage.
///
/// Uses CREATE TABLE IF NOT EXISTS for idempotent execution on every open.
pub const INITIAL_SCHEMA: &str = r#"
-- One row per storage slot; values are serialized text
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
"#;
