/*
 * Responsibility
 * - Path の String を公開 ID として受け、復号して内部 ID (i64) に変換する
 * - 失敗時は AppError (400 INVALID_PUBLIC_ID) に変換
 *
 * 置かないもの
 *  - ExchangeRate などの具体リソース名 (types.rs 側)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{error::AppError, state::AppState};

pub struct PublicId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PublicId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<T> FromRequestParts<AppState> for PublicId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(public_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_PUBLIC_ID", "invalid id"))?;
        let id = state.id_codec.decode(&public_id)?;
        Ok(Self::new(id))
    }
}

// Manual impls: the tag types are uninhabited markers without derives.
impl<T> Clone for PublicId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PublicId<T> {}

impl<T> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::PublicExchangeRateId;
    use crate::state::test_support::test_state;
    use axum::http::Request;

    #[tokio::test]
    async fn decoded_id_is_copy_and_debug() {
        let state = test_state();
        let public_id = state.id_codec.encode(42).unwrap();

        let app = axum::Router::new()
            .route(
                "/rates/{rate_id}",
                axum::routing::get(|id: PublicExchangeRateId| async move {
                    let copied = id;
                    format!("{} {:?}", id.id, copied)
                }),
            )
            .with_state(state);

        let res = tower::ServiceExt::oneshot(
            app,
            Request::builder()
                .uri(format!("/rates/{public_id}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"42 PublicId { id: 42 }");
    }

    #[test]
    fn tag_needs_no_derives() {
        fn assert_copy<C: Copy>() {}
        assert_copy::<PublicExchangeRateId>();
    }
}
