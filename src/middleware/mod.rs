/*
 * Responsibility
 * - middleware の公開インターフェース
 *   - auth::access: bearer token 検証 → AuthCtx
 *   - auth::permission: 操作ごとの permission guard
 *   - cors / http / security_headers: 横断的な HTTP 設定
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
