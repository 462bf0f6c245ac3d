/*
 * Responsibility
 * - /exchange-rates 系 handler
 * - Path の {rate_id} は公開 ID → extractor で復号化して内部 ID に変換して受け取る
 * - 登録はバージョニング (旧レートを無効化 → 新レートを有効化)。更新・削除は提供しない
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            exchange_rates::{
                CreateExchangeRateRequest, CreateExchangeRateResponse, ExchangeRateResponse,
                HistoryQuery, normalize_currency,
            },
            pagination::Pagination,
        },
        extractors::{ApiJson, ApiQuery, AuthCtxExtractor, public_id::PublicExchangeRateId},
    },
    error::AppError,
    repos::exchange_rate_repo::{self, ExchangeRateRow},
    state::AppState,
};

fn row_to_response(
    state: &AppState,
    row: ExchangeRateRow,
) -> Result<ExchangeRateResponse, AppError> {
    Ok(ExchangeRateResponse {
        id: state.id_codec.encode(row.rate_id)?,
        currency_code: row.currency_code,
        rate: row.rate,
        is_active: row.is_active,
        created_by: row.created_by,
        created_at: row.created_at,
    })
}

fn rows_to_response(
    state: &AppState,
    rows: Vec<ExchangeRateRow>,
) -> Result<Vec<ExchangeRateResponse>, AppError> {
    rows.into_iter()
        .map(|row| row_to_response(state, row))
        .collect()
}

pub async fn list_active_rates(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExchangeRateResponse>>, AppError> {
    let rows = exchange_rate_repo::list_active(&state.db).await?;
    Ok(Json(rows_to_response(&state, rows)?))
}

pub async fn rate_history(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<ExchangeRateResponse>>, AppError> {
    let currency = normalize_currency(&query.currency)
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };

    let rows =
        exchange_rate_repo::history(&state.db, &currency, page.limit(), page.offset()).await?;
    Ok(Json(rows_to_response(&state, rows)?))
}

pub async fn get_rate(
    State(state): State<AppState>,
    rate_id: PublicExchangeRateId,
) -> Result<Json<ExchangeRateResponse>, AppError> {
    let row = exchange_rate_repo::get(&state.db, rate_id.id)
        .await?
        .ok_or(AppError::not_found("exchange rate"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn create_rate(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateExchangeRateRequest>,
) -> Result<(StatusCode, Json<CreateExchangeRateResponse>), AppError> {
    let currency = req
        .validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let version =
        exchange_rate_repo::create_version(&state.db, &currency, req.rate, ctx.user_id).await?;

    tracing::info!(
        currency = %currency,
        rate = %version.rate.rate,
        rate_id = version.rate.rate_id,
        replaced_rate_id = ?version.replaced_rate_id,
        created_by = %ctx.user_id,
        jti = ?ctx.jti,
        "exchange rate version created"
    );

    let replaced_id = version
        .replaced_rate_id
        .map(|id| state.id_codec.encode(id))
        .transpose()?;

    Ok((
        StatusCode::CREATED,
        Json(CreateExchangeRateResponse {
            rate: row_to_response(&state, version.rate)?,
            replaced_id,
        }),
    ))
}
