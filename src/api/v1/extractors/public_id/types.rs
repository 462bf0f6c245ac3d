/*
 * Responsibility
 * - リソースごとの「意味付きID型」を宣言する
 */
use super::core::PublicId;

// exchange rates
pub enum ExchangeRateTag {}
pub type PublicExchangeRateId = PublicId<ExchangeRateTag>;
