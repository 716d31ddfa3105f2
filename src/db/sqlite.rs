use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::db::models::{DbExpense, DbRate, DbSale};
use crate::db::schema::SQLITE_INIT;
use crate::error::LedgerError;
use crate::service::pricing::Material;
use crate::types::expense::{ExpenseType, NewExpense};
use crate::types::rates::RateEntry;
use crate::types::report::{DailyReportRow, ExpenseTotals, MaterialReportRow, SalesTotals};
use crate::types::sale::NewSale;

pub type SqlitePool = Pool<Sqlite>;

/// Open (and create if missing) the SQLite database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, LedgerError> {
    let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(opts).await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct LedgerStorage {
    pool: SqlitePool,
}

impl LedgerStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), LedgerError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ---- daily_rates ----

    /// Batch upsert of a day's rate board in a single transaction.
    /// Uses SQLite `INSERT ... ON CONFLICT(asof_date, material, karat) DO UPDATE`.
    pub async fn upsert_rates(
        &self,
        asof_date: NaiveDate,
        inserted_by: &str,
        entries: &[RateEntry],
    ) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;
        let created_at = Utc::now().to_rfc3339();

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO daily_rates (
                    asof_date, material, karat, n_price, o_price, inserted_by, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(asof_date, material, karat) DO UPDATE SET
                    n_price=excluded.n_price,
                    o_price=excluded.o_price,
                    inserted_by=excluded.inserted_by,
                    created_at=excluded.created_at
                "#,
            )
            .bind(asof_date)
            .bind(entry.material.as_str())
            .bind(entry.karat.as_str())
            .bind(entry.n_price)
            .bind(entry.o_price)
            .bind(inserted_by)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn rates_for_date(&self, asof_date: NaiveDate) -> Result<Vec<DbRate>, LedgerError> {
        let rows = sqlx::query(
            r#"SELECT id, asof_date, material, karat, n_price, o_price, inserted_by, created_at
               FROM daily_rates WHERE asof_date = ?
               ORDER BY material, karat"#,
        )
        .bind(asof_date)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_rate).collect()
    }

    pub async fn rate_for(
        &self,
        asof_date: NaiveDate,
        material: Material,
        karat: &str,
    ) -> Result<Option<DbRate>, LedgerError> {
        let row = sqlx::query(
            r#"SELECT id, asof_date, material, karat, n_price, o_price, inserted_by, created_at
               FROM daily_rates WHERE asof_date = ? AND material = ? AND karat = ?"#,
        )
        .bind(asof_date)
        .bind(material.as_str())
        .bind(karat)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_rate).transpose()
    }

    pub async fn list_rates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DbRate>, LedgerError> {
        let rows = sqlx::query(
            r#"SELECT id, asof_date, material, karat, n_price, o_price, inserted_by, created_at
               FROM daily_rates WHERE asof_date BETWEEN ? AND ?
               ORDER BY asof_date DESC, material, karat"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_rate).collect()
    }

    // ---- expense_log ----

    /// Insert one expense row. A `(asof_date, expense_type, item_name)`
    /// collision is reported as [`LedgerError::DuplicateExpense`]
    /// carrying who entered the earlier row.
    pub async fn insert_expense(&self, expense: &NewExpense) -> Result<DbExpense, LedgerError> {
        let created_at = Utc::now().to_rfc3339();
        let res = sqlx::query(
            r#"
            INSERT INTO expense_log (
                asof_date, expense_type, item_name, cost, udhaar, inserted_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.asof_date)
        .bind(expense.expense_type.as_str())
        .bind(&expense.item_name)
        .bind(expense.cost)
        .bind(if expense.udhaar { 1_i64 } else { 0 })
        .bind(&expense.inserted_by)
        .bind(&created_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) => self.get_expense(done.last_insert_rowid()).await,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let earlier: (String,) = sqlx::query_as(
                    r#"SELECT inserted_by FROM expense_log
                       WHERE asof_date = ? AND expense_type = ? AND item_name = ?"#,
                )
                .bind(expense.asof_date)
                .bind(expense.expense_type.as_str())
                .bind(&expense.item_name)
                .fetch_one(&self.pool)
                .await?;
                Err(LedgerError::DuplicateExpense {
                    inserted_by: earlier.0,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_expense(&self, id: i64) -> Result<DbExpense, LedgerError> {
        let row = sqlx::query(
            r#"SELECT id, asof_date, expense_type, item_name, cost, udhaar, inserted_by, created_at
               FROM expense_log WHERE id = ?"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Self::row_to_expense(row)
    }

    pub async fn list_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        expense_type: Option<ExpenseType>,
        udhaar: Option<bool>,
    ) -> Result<Vec<DbExpense>, LedgerError> {
        let type_filter = expense_type.map(|t| t.as_str());
        let udhaar_filter = udhaar.map(|u| if u { 1_i64 } else { 0 });
        let rows = sqlx::query(
            r#"SELECT id, asof_date, expense_type, item_name, cost, udhaar, inserted_by, created_at
               FROM expense_log
               WHERE asof_date BETWEEN ? AND ?
                 AND (? IS NULL OR expense_type = ?)
                 AND (? IS NULL OR udhaar = ?)
               ORDER BY asof_date DESC, id DESC"#,
        )
        .bind(from)
        .bind(to)
        .bind(type_filter)
        .bind(type_filter)
        .bind(udhaar_filter)
        .bind(udhaar_filter)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_expense).collect()
    }

    // ---- sales_log ----

    /// Insert one sale row with the server-computed profit. A
    /// `(asof_date, tag_no)` collision is reported as
    /// [`LedgerError::DuplicateSale`].
    pub async fn insert_sale(&self, sale: &NewSale, profit: f64) -> Result<DbSale, LedgerError> {
        let created_at = Utc::now().to_rfc3339();
        let res = sqlx::query(
            r#"
            INSERT INTO sales_log (
                asof_date, customer_name, customer_phone, tag_no, item_name,
                material, item_type, p_grams, p_purity, p_cost,
                s_purity, wastage, s_cost, o_cost,
                o1_gram, o1_purity, o2_gram, o2_purity,
                profit, inserted_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.asof_date)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.tag_no)
        .bind(&sale.item_name)
        .bind(sale.material.as_str())
        .bind(&sale.item_type)
        .bind(sale.p_grams)
        .bind(sale.p_purity)
        .bind(sale.p_cost)
        .bind(sale.s_purity)
        .bind(sale.wastage)
        .bind(sale.s_cost)
        .bind(sale.o_cost)
        .bind(sale.o1_gram)
        .bind(sale.o1_purity)
        .bind(sale.o2_gram)
        .bind(sale.o2_purity)
        .bind(profit)
        .bind(&sale.inserted_by)
        .bind(&created_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) => self.get_sale(done.last_insert_rowid()).await,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let earlier: (String,) = sqlx::query_as(
                    "SELECT inserted_by FROM sales_log WHERE asof_date = ? AND tag_no = ?",
                )
                .bind(sale.asof_date)
                .bind(&sale.tag_no)
                .fetch_one(&self.pool)
                .await?;
                Err(LedgerError::DuplicateSale {
                    tag_no: sale.tag_no.clone(),
                    inserted_by: earlier.0,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_sale(&self, id: i64) -> Result<DbSale, LedgerError> {
        let row = sqlx::query(&format!("{SALE_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Self::row_to_sale(row)
    }

    pub async fn list_sales(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        material: Option<Material>,
    ) -> Result<Vec<DbSale>, LedgerError> {
        let material_filter = material.map(|m| m.as_str());
        let rows = sqlx::query(&format!(
            r#"{SALE_COLUMNS}
               WHERE asof_date BETWEEN ? AND ?
                 AND (? IS NULL OR material = ?)
               ORDER BY asof_date DESC, id DESC"#
        ))
        .bind(from)
        .bind(to)
        .bind(material_filter)
        .bind(material_filter)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_sale).collect()
    }

    // ---- reports ----

    pub async fn sales_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SalesTotals, LedgerError> {
        let (count, revenue, purchase_cost, old_cost, profit): (i64, f64, f64, f64, f64) =
            sqlx::query_as(
                r#"SELECT COUNT(*),
                          COALESCE(SUM(s_cost), 0),
                          COALESCE(SUM(p_cost), 0),
                          COALESCE(SUM(o_cost), 0),
                          COALESCE(SUM(profit), 0)
                   FROM sales_log WHERE asof_date BETWEEN ? AND ?"#,
            )
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;
        Ok(SalesTotals {
            count,
            revenue,
            purchase_cost,
            old_cost,
            profit,
        })
    }

    pub async fn expense_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ExpenseTotals, LedgerError> {
        let (count, total, direct, indirect, udhaar_total): (i64, f64, f64, f64, f64) =
            sqlx::query_as(
                r#"SELECT COUNT(*),
                          COALESCE(SUM(cost), 0),
                          COALESCE(SUM(CASE WHEN expense_type = 'direct' THEN cost ELSE 0 END), 0),
                          COALESCE(SUM(CASE WHEN expense_type = 'indirect' THEN cost ELSE 0 END), 0),
                          COALESCE(SUM(CASE WHEN udhaar = 1 THEN cost ELSE 0 END), 0)
                   FROM expense_log WHERE asof_date BETWEEN ? AND ?"#,
            )
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;
        Ok(ExpenseTotals {
            count,
            total,
            direct,
            indirect,
            udhaar_total,
        })
    }

    /// Per-day revenue/profit/expense rows over the range. Days with
    /// only sales or only expenses still get a row.
    pub async fn daily_breakdown(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyReportRow>, LedgerError> {
        let sales: Vec<(NaiveDate, f64, f64)> = sqlx::query_as(
            r#"SELECT asof_date, COALESCE(SUM(s_cost), 0), COALESCE(SUM(profit), 0)
               FROM sales_log WHERE asof_date BETWEEN ? AND ?
               GROUP BY asof_date"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let expenses: Vec<(NaiveDate, f64)> = sqlx::query_as(
            r#"SELECT asof_date, COALESCE(SUM(cost), 0)
               FROM expense_log WHERE asof_date BETWEEN ? AND ?
               GROUP BY asof_date"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut days: BTreeMap<NaiveDate, DailyReportRow> = BTreeMap::new();
        for (asof_date, revenue, profit) in sales {
            days.insert(
                asof_date,
                DailyReportRow {
                    asof_date,
                    revenue,
                    profit,
                    expense_total: 0.0,
                },
            );
        }
        for (asof_date, expense_total) in expenses {
            days.entry(asof_date)
                .or_insert(DailyReportRow {
                    asof_date,
                    revenue: 0.0,
                    profit: 0.0,
                    expense_total: 0.0,
                })
                .expense_total = expense_total;
        }
        Ok(days.into_values().collect())
    }

    /// Per-material sale totals with the average posted new-stock rate
    /// over the range.
    pub async fn material_breakdown(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MaterialReportRow>, LedgerError> {
        let rows: Vec<(String, i64, f64, f64, Option<f64>)> = sqlx::query_as(
            r#"SELECT s.material,
                      COUNT(*),
                      COALESCE(SUM(s.s_cost), 0),
                      COALESCE(SUM(s.profit), 0),
                      AVG(d.avg_n_price)
               FROM sales_log s
               LEFT JOIN (
                   SELECT material, asof_date, AVG(n_price) AS avg_n_price
                   FROM daily_rates GROUP BY material, asof_date
               ) d ON d.material = s.material AND d.asof_date = s.asof_date
               WHERE s.asof_date BETWEEN ? AND ?
               GROUP BY s.material
               ORDER BY SUM(s.profit) DESC"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(material, sales_count, revenue, profit, avg_n_price)| {
                let material = material
                    .parse::<Material>()
                    .map_err(|e| sqlx::Error::Decode(e.into()))?;
                Ok(MaterialReportRow {
                    material,
                    sales_count,
                    revenue,
                    profit,
                    avg_n_price,
                })
            })
            .collect()
    }

    // ---- row decoders ----

    fn row_to_rate(row: SqliteRow) -> Result<DbRate, LedgerError> {
        let id: i64 = row.try_get("id")?;
        let asof_date: NaiveDate = row.try_get("asof_date")?;
        let material: String = row.try_get("material")?;
        let karat: String = row.try_get("karat")?;
        let n_price: f64 = row.try_get("n_price")?;
        let o_price: f64 = row.try_get("o_price")?;
        let inserted_by: String = row.try_get("inserted_by")?;
        let created_at = Self::decode_created_at(&row)?;

        Ok(DbRate {
            id,
            asof_date,
            material: material
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            karat: karat
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            n_price,
            o_price,
            inserted_by,
            created_at,
        })
    }

    fn row_to_expense(row: SqliteRow) -> Result<DbExpense, LedgerError> {
        let id: i64 = row.try_get("id")?;
        let asof_date: NaiveDate = row.try_get("asof_date")?;
        let expense_type: String = row.try_get("expense_type")?;
        let item_name: String = row.try_get("item_name")?;
        let cost: f64 = row.try_get("cost")?;
        let udhaar_i: i64 = row.try_get("udhaar")?;
        let inserted_by: String = row.try_get("inserted_by")?;
        let created_at = Self::decode_created_at(&row)?;

        Ok(DbExpense {
            id,
            asof_date,
            expense_type: expense_type
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            item_name,
            cost,
            udhaar: udhaar_i != 0,
            inserted_by,
            created_at,
        })
    }

    fn row_to_sale(row: SqliteRow) -> Result<DbSale, LedgerError> {
        let material: String = row.try_get("material")?;
        let created_at = Self::decode_created_at(&row)?;

        Ok(DbSale {
            id: row.try_get("id")?,
            asof_date: row.try_get("asof_date")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            tag_no: row.try_get("tag_no")?,
            item_name: row.try_get("item_name")?,
            material: material
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            item_type: row.try_get("item_type")?,
            p_grams: row.try_get("p_grams")?,
            p_purity: row.try_get("p_purity")?,
            p_cost: row.try_get("p_cost")?,
            s_purity: row.try_get("s_purity")?,
            wastage: row.try_get("wastage")?,
            s_cost: row.try_get("s_cost")?,
            o_cost: row.try_get("o_cost")?,
            o1_gram: row.try_get("o1_gram")?,
            o1_purity: row.try_get("o1_purity")?,
            o2_gram: row.try_get("o2_gram")?,
            o2_purity: row.try_get("o2_purity")?,
            profit: row.try_get("profit")?,
            inserted_by: row.try_get("inserted_by")?,
            created_at,
        })
    }

    fn decode_created_at(row: &SqliteRow) -> Result<DateTime<Utc>, LedgerError> {
        let created_at_str: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);
        Ok(created_at)
    }
}

const SALE_COLUMNS: &str = r#"SELECT id, asof_date, customer_name, customer_phone, tag_no,
    item_name, material, item_type, p_grams, p_purity, p_cost,
    s_purity, wastage, s_cost, o_cost,
    o1_gram, o1_purity, o2_gram, o2_purity,
    profit, inserted_by, created_at
    FROM sales_log"#;
