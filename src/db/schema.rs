//! SQL DDL for initializing the ledger storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema.
///
/// Duplicate-entry detection is enforced here rather than by
/// pre-insert queries: the UNIQUE keys on `expense_log` and
/// `sales_log` make concurrent double-submission lose at the database
/// instead of racing a read-then-write check, and
/// `daily_rates(asof_date, material, karat)` is the upsert conflict
/// target for the rate board.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS daily_rates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    asof_date TEXT NOT NULL,
    material TEXT NOT NULL,
    karat TEXT NOT NULL,
    n_price REAL NOT NULL,
    o_price REAL NOT NULL,
    inserted_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(asof_date, material, karat)
);

CREATE INDEX IF NOT EXISTS idx_daily_rates_asof_date ON daily_rates(asof_date);

CREATE TABLE IF NOT EXISTS expense_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    asof_date TEXT NOT NULL,
    expense_type TEXT NOT NULL,
    item_name TEXT NOT NULL,
    cost REAL NOT NULL,
    udhaar INTEGER NOT NULL DEFAULT 0,
    inserted_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(asof_date, expense_type, item_name)
);

CREATE INDEX IF NOT EXISTS idx_expense_log_asof_date ON expense_log(asof_date);

CREATE TABLE IF NOT EXISTS sales_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    asof_date TEXT NOT NULL,
    customer_name TEXT NOT NULL,
    customer_phone TEXT NOT NULL,
    tag_no TEXT NOT NULL,
    item_name TEXT NOT NULL,
    material TEXT NOT NULL,
    item_type TEXT NOT NULL,
    p_grams REAL NOT NULL,
    p_purity REAL NOT NULL,
    p_cost REAL NOT NULL,
    s_purity REAL NULL,
    wastage REAL NULL,
    s_cost REAL NOT NULL,
    o_cost REAL NULL,
    o1_gram REAL NULL,
    o1_purity REAL NULL,
    o2_gram REAL NULL,
    o2_purity REAL NULL,
    profit REAL NOT NULL,
    inserted_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(asof_date, tag_no)
);

CREATE INDEX IF NOT EXISTS idx_sales_log_asof_date ON sales_log(asof_date);
CREATE INDEX IF NOT EXISTS idx_sales_log_material ON sales_log(material);
"#;
