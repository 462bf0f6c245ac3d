/*
 * Responsibility
 * - v1 の request/response DTO と入力の形式チェック (validate)
 */
pub mod exchange_rates;
pub mod me;
pub mod pagination;
pub mod users;
