use anyhow::Result;
use sqlx::MySqlPool;

/// Inserts one report row. `report_date` is filled in by the database.
///
/// Single attempt, single statement; the connection is checked out from
/// the pool and returned on every exit path. Duplicate ids are allowed
/// and accumulate as separate rows.
pub async fn insert_report(pool: &MySqlPool, report_id: &str, report_result: &str) -> Result<()> {
    sqlx::query("INSERT INTO report (id, result) VALUES (?, ?)")
        .bind(report_id)
        .bind(report_result)
        .execute(pool)
        .await?;
    Ok(())
}
