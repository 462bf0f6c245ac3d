/*
 * Responsibility
 * - exchange_rates CRUD (履歴は削除しない)
 * - 新しいレートの登録 = 同一通貨の有効レートを無効化 → 新レートを有効として INSERT
 *   (1 トランザクション、通貨ごとに advisory lock で直列化)
 */
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExchangeRateRow {
    #[sqlx(rename = "rateId")]
    pub rate_id: i64,

    #[sqlx(rename = "currencyCode")]
    pub currency_code: String,

    pub rate: Decimal,

    #[sqlx(rename = "isActive")]
    pub is_active: bool,

    #[sqlx(rename = "createdBy")]
    pub created_by: Uuid,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewVersion {
    pub rate: ExchangeRateRow,
    // rateId of the version that was active before this one
    pub replaced_rate_id: Option<i64>,
}

pub async fn list_active(pool: &PgPool) -> RepoResult<Vec<ExchangeRateRow>> {
    let rows = sqlx::query_as::<_, ExchangeRateRow>(
        r#"
        SELECT
            "rateId", "currencyCode", rate, "isActive", "createdBy", "createdAt"
        FROM exchange_rates
        WHERE "isActive"
        ORDER BY "currencyCode"
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn history(
    pool: &PgPool,
    currency_code: &str,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<ExchangeRateRow>> {
    let rows = sqlx::query_as::<_, ExchangeRateRow>(
        r#"
        SELECT
            "rateId", "currencyCode", rate, "isActive", "createdBy", "createdAt"
        FROM exchange_rates
        WHERE "currencyCode" = $1
        ORDER BY "rateId" DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(currency_code)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get(pool: &PgPool, rate_id: i64) -> RepoResult<Option<ExchangeRateRow>> {
    let row = sqlx::query_as::<_, ExchangeRateRow>(
        r#"
        SELECT
            "rateId", "currencyCode", rate, "isActive", "createdBy", "createdAt"
        FROM exchange_rates
        WHERE "rateId" = $1
        "#,
    )
    .bind(rate_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn create_version(
    pool: &PgPool,
    currency_code: &str,
    rate: Decimal,
    created_by: Uuid,
) -> RepoResult<NewVersion> {
    let mut tx = pool.begin().await?;

    // Concurrent writers for the same currency wait here instead of racing
    // into the partial unique index.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(currency_code)
        .execute(&mut *tx)
        .await?;

    let replaced_rate_id: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE exchange_rates
        SET "isActive" = false
        WHERE "currencyCode" = $1 AND "isActive"
        RETURNING "rateId"
        "#,
    )
    .bind(currency_code)
    .fetch_optional(&mut *tx)
    .await?;

    let rate = sqlx::query_as::<_, ExchangeRateRow>(
        r#"
        INSERT INTO exchange_rates ("currencyCode", rate, "isActive", "createdBy")
        VALUES ($1, $2, true, $3)
        RETURNING
            "rateId", "currencyCode", rate, "isActive", "createdBy", "createdAt"
        "#,
    )
    .bind(currency_code)
    .bind(rate)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await
    .map_err(RepoError::from_sqlx)?;

    tx.commit().await?;

    Ok(NewVersion {
        rate,
        replaced_rate_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn rate(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn first_version_replaces_nothing(pool: PgPool) {
        let author = Uuid::new_v4();

        let version = create_version(&pool, "USD", rate("36.5"), author)
            .await
            .unwrap();

        assert_eq!(version.replaced_rate_id, None);
        assert!(version.rate.is_active);
        assert_eq!(version.rate.currency_code, "USD");
        assert_eq!(version.rate.rate, rate("36.5"));
        assert_eq!(version.rate.created_by, author);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn new_version_deactivates_previous_one(pool: PgPool) {
        let author = Uuid::new_v4();
        let first = create_version(&pool, "USD", rate("36.5"), author)
            .await
            .unwrap();
        let second = create_version(&pool, "USD", rate("37.125"), author)
            .await
            .unwrap();

        assert_eq!(second.replaced_rate_id, Some(first.rate.rate_id));

        let old = get(&pool, first.rate.rate_id).await.unwrap().unwrap();
        assert!(!old.is_active);
        assert_eq!(old.rate, rate("36.5"));

        let active = list_active(&pool).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].rate_id, second.rate.rate_id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn one_active_rate_per_currency(pool: PgPool) {
        let author = Uuid::new_v4();
        for (code, value) in [("USD", "36.5"), ("EUR", "39.8"), ("USD", "36.9")] {
            create_version(&pool, code, rate(value), author)
                .await
                .unwrap();
        }

        let active = list_active(&pool).await.unwrap();
        let summary: Vec<(&str, Decimal)> = active
            .iter()
            .map(|r| (r.currency_code.as_str(), r.rate))
            .collect();

        assert_eq!(summary, vec![("EUR", rate("39.8")), ("USD", rate("36.9"))]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn history_is_newest_first_and_paginated(pool: PgPool) {
        let author = Uuid::new_v4();
        let mut ids = Vec::new();
        for value in ["36.1", "36.2", "36.3"] {
            let version = create_version(&pool, "USD", rate(value), author)
                .await
                .unwrap();
            ids.push(version.rate.rate_id);
        }
        create_version(&pool, "EUR", rate("39.8"), author)
            .await
            .unwrap();

        let all = history(&pool, "USD", 50, 0).await.unwrap();
        let got: Vec<i64> = all.iter().map(|r| r.rate_id).collect();
        assert_eq!(got, vec![ids[2], ids[1], ids[0]]);
        assert_eq!(
            all.iter().map(|r| r.is_active).collect::<Vec<_>>(),
            vec![true, false, false]
        );

        let page = history(&pool, "USD", 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].rate_id, ids[1]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn concurrent_writers_leave_a_single_active_rate(pool: PgPool) {
        let author = Uuid::new_v4();

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    create_version(&pool, "USD", Decimal::new(3650 + i, 2), author).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let versions = history(&pool, "USD", 50, 0).await.unwrap();
        assert_eq!(versions.len(), 5);
        assert_eq!(versions.iter().filter(|r| r.is_active).count(), 1);
        assert!(versions[0].is_active);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn second_active_row_violates_unique_index(pool: PgPool) {
        create_version(&pool, "USD", rate("36.5"), Uuid::new_v4())
            .await
            .unwrap();

        let err = sqlx::query(
            r#"
            INSERT INTO exchange_rates ("currencyCode", rate, "isActive", "createdBy")
            VALUES ('USD', 40, true, $1)
            "#,
        )
        .bind(Uuid::new_v4())
        .execute(&pool)
        .await
        .map_err(RepoError::from_sqlx)
        .unwrap_err();

        assert!(matches!(err, RepoError::Conflict));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn get_missing_rate_is_none(pool: PgPool) {
        assert!(get(&pool, 42).await.unwrap().is_none());
    }
}
