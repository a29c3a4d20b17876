use rust_decimal::Decimal;
use sqlx::{Row, TypeInfo, ValueRef};
use tax_core::RepositoryError;

/// Read a monetary column.
///
/// Amounts are written as decimal text, but hand-edited databases may hold
/// INTEGER or REAL values, so those are accepted too. NULL is an error.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Err(RepositoryError::Database(format!(
            "Column '{}' is NULL",
            column
        )));
    }

    let type_name = value_ref.type_info().name().to_string();
    let column_error =
        |e: sqlx::Error| RepositoryError::Database(format!("Failed to read '{}': {}", column, e));

    match type_name.as_str() {
        "TEXT" => {
            let text: String = row.try_get(column).map_err(column_error)?;
            text.trim().parse::<Decimal>().map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to parse decimal '{}' in '{}': {}",
                    text, column, e
                ))
            })
        }
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(column_error)?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(column_error)?;
            Decimal::try_from(val).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            other, column
        ))),
    }
}

/// Canonical text form used when writing an amount.
pub fn decimal_to_text(d: Decimal) -> String {
    d.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE amounts (
                id INTEGER PRIMARY KEY,
                value ANY
            ) STRICT",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch_value(sql_literal: &str) -> SqliteRow {
        let pool = setup_test_db().await;
        sqlx::query(&format!(
            "INSERT INTO amounts (id, value) VALUES (1, {sql_literal})"
        ))
        .execute(&pool)
        .await
        .expect("Failed to insert test data");

        sqlx::query("SELECT value FROM amounts WHERE id = 1")
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch row")
    }

    #[tokio::test]
    async fn get_decimal_from_text() {
        let row = fetch_value("'100000.50'").await;

        assert_eq!(get_decimal(&row, "value"), Ok(dec!(100000.50)));
    }

    #[tokio::test]
    async fn get_decimal_from_text_with_whitespace() {
        let row = fetch_value("' 60000 '").await;

        assert_eq!(get_decimal(&row, "value"), Ok(dec!(60000)));
    }

    #[tokio::test]
    async fn get_decimal_from_integer() {
        let row = fetch_value("50000").await;

        assert_eq!(get_decimal(&row, "value"), Ok(dec!(50000)));
    }

    #[tokio::test]
    async fn get_decimal_from_real() {
        let row = fetch_value("2500.5").await;

        assert_eq!(get_decimal(&row, "value"), Ok(dec!(2500.5)));
    }

    #[tokio::test]
    async fn get_decimal_rejects_null() {
        let row = fetch_value("NULL").await;

        assert!(matches!(
            get_decimal(&row, "value"),
            Err(RepositoryError::Database(_))
        ));
    }

    #[tokio::test]
    async fn get_decimal_rejects_unparseable_text() {
        let row = fetch_value("'sixty thousand'").await;

        match get_decimal(&row, "value") {
            Err(RepositoryError::Database(msg)) => assert!(msg.contains("sixty thousand")),
            other => panic!("expected Database error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_decimal_unknown_column() {
        let row = fetch_value("1").await;

        assert!(matches!(
            get_decimal(&row, "missing"),
            Err(RepositoryError::Database(_))
        ));
    }

    #[test]
    fn decimal_to_text_drops_trailing_zeros() {
        assert_eq!(decimal_to_text(dec!(60000.00)), "60000");
        assert_eq!(decimal_to_text(dec!(12345.50)), "12345.5");
    }
}
