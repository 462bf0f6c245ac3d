/*
 * Responsibility
 * - ExchangeRates の request/response DTO
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// NUMERIC(18, 6)
const MAX_SCALE: u32 = 6;

pub fn normalize_currency(code: &str) -> Result<String, &'static str> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err("currency_code must be 3 letters (ISO 4217)");
    }
    Ok(code)
}

#[derive(Debug, Deserialize)]
pub struct CreateExchangeRateRequest {
    pub currency_code: String,
    pub rate: Decimal,
}

impl CreateExchangeRateRequest {
    /// Returns the normalized currency code.
    pub fn validate(&self) -> Result<String, &'static str> {
        let code = normalize_currency(&self.currency_code)?;
        if self.rate <= Decimal::ZERO {
            return Err("rate must be greater than 0");
        }
        if self.rate.normalize().scale() > MAX_SCALE {
            return Err("rate supports at most 6 decimal places");
        }
        Ok(code)
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub currency: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ExchangeRateResponse {
    pub id: String, // encoded
    pub currency_code: String,
    pub rate: Decimal,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateExchangeRateResponse {
    #[serde(flatten)]
    pub rate: ExchangeRateResponse,
    // encoded id of the version this one replaced
    pub replaced_id: Option<String>,
}
