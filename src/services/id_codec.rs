/*
 * Responsibility
 * - 公開 ID ↔ 内部 ID (BIGSERIAL) の変換 (encode/decode)
 * - exchange_rates のように連番 ID を持つリソースで、件数や採番順を外に漏らさない
 * - Extractor や handler からはこの service だけを使う (方式変更の影響を局所化)
 *
 * thiserror を使わない理由:
 * - このモジュール内で完結するエラー型なので
 */
use sqids::{Error as SqidsError, Sqids};
use std::{error::Error, fmt};

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug)]
pub enum IdCodecError {
    InvalidMinLength { value: usize },
    Sqids(SqidsError),
    NegativeId { value: i64 },
    DecodeInvalidFormat,
    DecodeOutOfRange,
}

impl fmt::Display for IdCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdCodecError::InvalidMinLength { value } => {
                write!(f, "SQIDS_MIN_LENGTH must be between 0 and 255, got {value}")
            }
            IdCodecError::Sqids(e) => write!(f, "sqids error: {e}"),
            IdCodecError::NegativeId { value } => write!(f, "id must be non-negative, got {value}"),
            IdCodecError::DecodeInvalidFormat => f.write_str("invalid public id format"),
            IdCodecError::DecodeOutOfRange => f.write_str("decoded id is out of range"),
        }
    }
}

impl Error for IdCodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IdCodecError::Sqids(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SqidsError> for IdCodecError {
    fn from(e: SqidsError) -> Self {
        IdCodecError::Sqids(e)
    }
}

impl IdCodecError {
    /// `true` when the client sent a malformed id (as opposed to a server-side misconfiguration).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::DecodeInvalidFormat | Self::DecodeOutOfRange)
    }
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String> {
        let n = u64::try_from(id).map_err(|_| IdCodecError::NegativeId { value: id })?;
        Ok(self.sqids.encode(&[n])?)
    }

    pub fn decode(&self, public_id: &str) -> Result<i64> {
        let nums = self.sqids.decode(public_id);
        let [n] = nums.as_slice() else {
            return Err(IdCodecError::DecodeInvalidFormat);
        };
        // sqids decodes non-canonical strings too; only accept the canonical form.
        if self.sqids.encode(&[*n])? != public_id {
            return Err(IdCodecError::DecodeInvalidFormat);
        }
        i64::try_from(*n).map_err(|_| IdCodecError::DecodeOutOfRange)
    }
}
