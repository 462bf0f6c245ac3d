/*
 * Responsibility
 * - handler / middleware から使うドメイン外のサービス群
 *   - auth: access token 検証 (claims の取り出し)
 *   - authz: permission 判定
 *   - id_codec: 公開 ID ↔ 内部 ID
 */
pub mod auth;
pub mod authz;
pub mod id_codec;
