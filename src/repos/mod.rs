/*
 * Responsibility
 * - SQLx によるテーブル単位の永続化
 * - handler からは関数として呼ぶ (PgPool を引数で受け取る)
 */
pub mod error;
pub mod exchange_rate_repo;
pub mod user_repo;
