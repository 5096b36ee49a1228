use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const INVALID_LOCATION: &str = "Invalid data format.";

// Keys a location submission must carry
const REQUIRED_KEYS: [&str; 4] = ["lat", "lng", "address", "photo"];

/// One submitted photo with its coordinates and address.
///
/// The object is stored exactly as the client sent it, key order and any
/// extra keys included. Only the presence of the four keys is checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LocationRecord(Map<String, Value>);

impl LocationRecord {
    pub fn from_submission(body: Value) -> Result<Self, ApiError> {
        let Value::Object(obj) = body else {
            return Err(ApiError::InvalidRequest(INVALID_LOCATION));
        };
        if !REQUIRED_KEYS.iter().all(|k| obj.contains_key(*k)) {
            return Err(ApiError::InvalidRequest(INVALID_LOCATION));
        }
        Ok(Self(obj))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn lat(&self) -> Option<&Value> {
        self.get("lat")
    }

    pub fn lng(&self) -> Option<&Value> {
        self.get("lng")
    }

    pub fn address(&self) -> Option<&Value> {
        self.get("address")
    }

    pub fn photo(&self) -> Option<&Value> {
        self.get("photo") // usually a data URL
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageSavedResponse {
    pub message: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub locations: usize,
    pub started_at: String, // RFC3339
}
