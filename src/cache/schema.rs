/// Schema of the local answer cache.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- Answers table: one JSON-encoded answer record per question
CREATE TABLE IF NOT EXISTS answers (
    question TEXT PRIMARY KEY NOT NULL,
    record TEXT NOT NULL,
    cached_at INTEGER NOT NULL
);

-- Index for expiring or listing answers by age
CREATE INDEX IF NOT EXISTS idx_answers_cached_at ON answers(cached_at);
"#;
