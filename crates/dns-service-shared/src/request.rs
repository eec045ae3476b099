//! Request decoding and validation for HTTP endpoints.
//!
//! Decoding happens in two steps that fail differently:
//!
//! 1. The body is parsed into a wire struct. Malformed JSON, or a field that
//!    is present but not a numeric string, is a [`WebError::Decode`].
//! 2. The wire struct is validated and converted into its domain type.
//!    Missing fields are a [`WebError::Validation`] listing every one.

use axum::body::{to_bytes, Body, Bytes};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use dns_lib::CoordsVelocity;

use crate::error::{FieldError, WebError};

/// Validation trait for request types.
///
/// Implementations check field presence and convert the parsed wire struct
/// into the value the handler works with.
pub trait Validate {
    /// Validated form of the request.
    type Output;

    /// Validate the request, returning one [`FieldError`] per failing field.
    fn validate(self) -> Result<Self::Output, Vec<FieldError>>;
}

/// Read a request body into memory, refusing bodies larger than `limit`.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, WebError> {
    to_bytes(body, limit)
        .await
        .map_err(|e| WebError::decode(format!("unreadable body: {}", e)))
}

/// Parse `bytes` as `T`, then validate it.
///
/// The body must be a JSON object; arrays and scalars are malformed even
/// when `T` could be built from them.
pub fn decode<T>(bytes: &[u8]) -> Result<T::Output, WebError>
where
    T: DeserializeOwned + Validate,
{
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| WebError::decode(e.to_string()))?;
    if !value.is_object() {
        return Err(WebError::decode("request body must be a JSON object"));
    }

    let parsed: T = serde_json::from_value(value).map_err(|e| WebError::decode(e.to_string()))?;
    parsed
        .validate()
        .map_err(|fields| WebError::Validation { fields })
}

/// Wire payload for `POST /v1/locate`.
///
/// Every component travels as a numeric string (`"123.12"`), not as a JSON
/// number. Absent and `null` fields decode to `None` and are reported by
/// [`Validate::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocateRequest {
    #[serde(default, deserialize_with = "numeric_string")]
    pub x: Option<f64>,

    #[serde(default, deserialize_with = "numeric_string")]
    pub y: Option<f64>,

    #[serde(default, deserialize_with = "numeric_string")]
    pub z: Option<f64>,

    #[serde(default, deserialize_with = "numeric_string")]
    pub vel: Option<f64>,
}

impl Validate for LocateRequest {
    type Output = CoordsVelocity;

    fn validate(self) -> Result<CoordsVelocity, Vec<FieldError>> {
        match (self.x, self.y, self.z, self.vel) {
            (Some(x), Some(y), Some(z), Some(vel)) => Ok(CoordsVelocity::new(x, y, z, vel)),
            _ => Err([
                ("x", self.x),
                ("y", self.y),
                ("z", self.z),
                ("vel", self.vel),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| FieldError::required(field))
            .collect()),
        }
    }
}

fn numeric_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_number(&s).map_err(<D::Error as de::Error>::custom))
        .transpose()
}

fn parse_number(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("invalid numeric string {:?}", s))?;
    if !value.is_finite() {
        return Err(format!("numeric string {:?} is not finite", s));
    }
    Ok(value)
}
