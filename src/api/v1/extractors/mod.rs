/*
 * Responsibility
 * - handler が受け取る独自 extractor の公開口
 */
pub mod auth_ctx;
pub mod public_id;
pub mod request;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use request::{ApiJson, ApiPath, ApiQuery};
