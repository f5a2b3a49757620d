//! Raw contract response shape and lossless numeric conversion.
//!
//! Contract timestamps arrive as `uint256` words, as decimal or `0x` hex
//! strings when relayed through JSON, or as plain JSON numbers. Every shape
//! is converted to `u64` seconds or rejected with a [`DecodeError`] that names
//! the offending field.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a contract response could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` is not an integer: {value}")]
    Malformed { field: &'static str, value: String },

    #[error("field `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("contract returned {records} metadata records for {ids} token ids")]
    LengthMismatch { ids: usize, records: usize },
}

/// A numeric-like field as it may appear in a contract response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WideInt {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl WideInt {
    /// Convert to `u64` without loss, or fail naming `field`.
    pub fn to_u64(&self, field: &'static str) -> Result<u64, DecodeError> {
        match self {
            WideInt::Unsigned(v) => Ok(*v),
            WideInt::Signed(v) => u64::try_from(*v).map_err(|_| DecodeError::OutOfRange {
                field,
                value: v.to_string(),
            }),
            WideInt::Float(v) => {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(DecodeError::Malformed {
                        field,
                        value: v.to_string(),
                    });
                }
                // 2^64 is exactly representable; anything at or above it overflows.
                if *v < 0.0 || *v >= 18_446_744_073_709_551_616.0 {
                    return Err(DecodeError::OutOfRange {
                        field,
                        value: v.to_string(),
                    });
                }
                Ok(*v as u64)
            }
            WideInt::Text(s) => parse_text(s, field),
        }
    }
}

fn parse_text(raw: &str, field: &'static str) -> Result<u64, DecodeError> {
    let text = raw.trim();
    let malformed = || DecodeError::Malformed {
        field,
        value: raw.to_string(),
    };

    if text.starts_with('-') {
        return match text[1..].parse::<u128>() {
            Ok(0) => Ok(0),
            Ok(_) => Err(DecodeError::OutOfRange {
                field,
                value: raw.to_string(),
            }),
            Err(_) => Err(malformed()),
        };
    }

    let word = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16).map_err(|_| malformed())?,
        Some(_) => return Err(malformed()),
        None if text.is_empty() => return Err(malformed()),
        None => U256::from_str_radix(text, 10).map_err(|_| malformed())?,
    };

    u64::try_from(word).map_err(|_| DecodeError::OutOfRange {
        field,
        value: raw.to_string(),
    })
}

impl From<U256> for WideInt {
    fn from(value: U256) -> Self {
        match u64::try_from(value) {
            Ok(v) => WideInt::Unsigned(v),
            Err(_) => WideInt::Text(value.to_string()),
        }
    }
}

impl From<u64> for WideInt {
    fn from(value: u64) -> Self {
        WideInt::Unsigned(value)
    }
}

/// Metadata record as returned by `getMetadatas`, before normalization.
///
/// Every field is optional so that an incomplete response is reported as a
/// decode error instead of failing deserialization with an opaque message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGoalMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageSVG")]
    pub image_svg: Option<String>,
    pub created_at: Option<WideInt>,
    pub due_date: Option<WideInt>,
    pub achieved_at: Option<WideInt>,
}

impl RawGoalMetadata {
    pub(crate) fn required_text(
        value: &Option<String>,
        field: &'static str,
    ) -> Result<String, DecodeError> {
        value.clone().ok_or(DecodeError::MissingField { field })
    }

    pub(crate) fn required_u64(
        value: &Option<WideInt>,
        field: &'static str,
    ) -> Result<u64, DecodeError> {
        value
            .as_ref()
            .ok_or(DecodeError::MissingField { field })?
            .to_u64(field)
    }
}

/// Convert an on-chain token id to the native id range.
pub fn decode_token_id(id: U256) -> Result<u64, DecodeError> {
    u64::try_from(id).map_err(|_| DecodeError::OutOfRange {
        field: "tokenId",
        value: id.to_string(),
    })
}
