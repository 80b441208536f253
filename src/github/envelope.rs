use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Pulls `T` out of a `{"data": T}` envelope.
///
/// A missing or null `data` field means the server has nothing yet and yields
/// `Ok(None)`; a `data` field of the wrong shape is a decode error.
pub fn decode_envelope<T: DeserializeOwned>(body: &Value) -> Result<Option<T>> {
    match body.get("data") {
        None | Some(Value::Null) => Ok(None),
        Some(data) => T::deserialize(data)
            .map(Some)
            .map_err(|e| Error::Decode(e.to_string())),
    }
}
