/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - email の重複 (unique_violation) は RepoError::Conflict として返す
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    #[sqlx(rename = "isActive")]
    pub is_active: bool,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub struct NewUser<'a> {
    pub user_name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub phone: Option<&'a str>,
}

/// Partial update. `phone` is tri-state:
/// - None: do not update
/// - Some(None): set NULL
/// - Some(Some(v)): set v
#[derive(Default)]
pub struct UserChanges<'a> {
    pub user_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub role: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub is_active: Option<bool>,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "userName", email, role, phone, "isActive", "createdAt"
        FROM users
        ORDER BY "createdAt" DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, user: NewUser<'_>) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users ("userName", email, role, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING "userId", "userName", email, role, phone, "isActive", "createdAt"
        "#,
    )
    .bind(user.user_name)
    .bind(user.email)
    .bind(user.role)
    .bind(user.phone)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "userName", email, role, phone, "isActive", "createdAt"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    changes: UserChanges<'_>,
) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET
            "userName" = COALESCE($2, "userName"),
            email = COALESCE($3, email),
            role = COALESCE($4, role),
            phone = CASE
                WHEN $5 = false THEN phone
                ELSE $6
            END,
            "isActive" = COALESCE($7, "isActive"),
            "updatedAt" = now()
        WHERE "userId" = $1
        RETURNING "userId", "userName", email, role, phone, "isActive", "createdAt"
        "#,
    )
    .bind(user_id)
    .bind(changes.user_name)
    .bind(changes.email)
    .bind(changes.role)
    .bind(changes.phone.is_some()) // $5: flag to set phone
    .bind(changes.phone.flatten()) // $6: new phone value
    .bind(changes.is_active)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user<'a>(email: &'a str, role: &'a str) -> NewUser<'a> {
        NewUser {
            user_name: "Ana Pérez",
            email,
            role,
            phone: Some("+58 412 0000000"),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_and_get(pool: PgPool) {
        let created = create(&pool, new_user("ana@camihogar.com", "Store Seller"))
            .await
            .unwrap();

        let fetched = get(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "ana@camihogar.com");
        assert_eq!(fetched.role, "Store Seller");
        assert_eq!(fetched.phone.as_deref(), Some("+58 412 0000000"));
        assert!(fetched.is_active);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_email_is_conflict(pool: PgPool) {
        create(&pool, new_user("ana@camihogar.com", "Store Seller"))
            .await
            .unwrap();

        let err = create(&pool, new_user("Ana@CamiHogar.com", "Supervisor"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Conflict));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_to_taken_email_is_conflict(pool: PgPool) {
        create(&pool, new_user("ana@camihogar.com", "Store Seller"))
            .await
            .unwrap();
        let luis = create(&pool, new_user("luis@camihogar.com", "Store Seller"))
            .await
            .unwrap();

        let changes = UserChanges {
            email: Some("ana@camihogar.com"),
            ..Default::default()
        };
        let err = update(&pool, luis.id, changes).await.unwrap_err();

        assert!(matches!(err, RepoError::Conflict));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_phone_is_tri_state(pool: PgPool) {
        let user = create(&pool, new_user("ana@camihogar.com", "Store Seller"))
            .await
            .unwrap();

        // missing field keeps the phone
        let kept = update(
            &pool,
            user.id,
            UserChanges {
                role: Some("Supervisor"),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(kept.role, "Supervisor");
        assert_eq!(kept.phone.as_deref(), Some("+58 412 0000000"));

        // explicit null clears it
        let cleared = update(
            &pool,
            user.id,
            UserChanges {
                phone: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(cleared.phone, None);
        assert_eq!(cleared.role, "Supervisor");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_missing_user_is_none(pool: PgPool) {
        let changes = UserChanges {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(update(&pool, Uuid::new_v4(), changes).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_reports_whether_a_row_was_removed(pool: PgPool) {
        let user = create(&pool, new_user("ana@camihogar.com", "Store Seller"))
            .await
            .unwrap();

        assert!(delete(&pool, user.id).await.unwrap());
        assert!(!delete(&pool, user.id).await.unwrap());
        assert!(get(&pool, user.id).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_is_paginated(pool: PgPool) {
        for email in ["a@camihogar.com", "b@camihogar.com", "c@camihogar.com"] {
            create(&pool, new_user(email, "Store Seller")).await.unwrap();
        }

        assert_eq!(list(&pool, 50, 0).await.unwrap().len(), 3);
        assert_eq!(list(&pool, 2, 0).await.unwrap().len(), 2);
        assert_eq!(list(&pool, 2, 2).await.unwrap().len(), 1);
    }
}
