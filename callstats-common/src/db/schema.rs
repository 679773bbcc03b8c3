//! Table definitions
//!
//! Every statement is idempotent (`IF NOT EXISTS`) so startup can run them
//! against an existing database.

/// Summary sheet rows, one per calendar month
pub const CREATE_SUMMARY_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS summary (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        time_period DATE NOT NULL,
        calls_offered INTEGER NOT NULL CHECK (calls_offered >= 0),
        abandoned_after_30 REAL NOT NULL CHECK (abandoned_after_30 BETWEEN 0.0 AND 1.0),
        fcr REAL NOT NULL CHECK (fcr BETWEEN 0.0 AND 1.0),
        dsat REAL NOT NULL CHECK (dsat BETWEEN 0.0 AND 1.0),
        csat REAL NOT NULL CHECK (csat BETWEEN 0.0 AND 1.0)
    )
"#;

/// Voice-of-customer columns, one per month
pub const CREATE_VOC_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS voc (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        time_period DATE NOT NULL,
        promoters INTEGER NOT NULL CHECK (promoters >= 0),
        passives INTEGER NOT NULL CHECK (passives >= 0),
        detractors INTEGER NOT NULL CHECK (detractors >= 0)
    )
"#;

/// Submission ledger. The primary key on filename is the idempotency gate.
pub const CREATE_SUBMISSIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS submissions (
        filename TEXT PRIMARY KEY,
        submitted_at TEXT NOT NULL,
        state TEXT NOT NULL DEFAULT 'RECEIVED',
        reason TEXT
    )
"#;

pub const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_summary_time_period ON summary(time_period)",
    "CREATE INDEX IF NOT EXISTS idx_voc_time_period ON voc(time_period)",
];
