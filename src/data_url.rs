/*
Data-URL payload handling for uploaded photos.
"<metadata>,<payload>": only the part after the first comma is the image.
*/

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub metadata: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, ApiError> {
        let Some((metadata, payload)) = raw.split_once(',') else {
            return Err(ApiError::MalformedPayload(
                "Image data must be a data URL of the form <metadata>,<payload>.".to_string(),
            ));
        };
        Ok(Self { metadata, payload })
    }

    pub fn is_base64(&self) -> bool {
        self.metadata.ends_with(";base64")
    }

    /// Bytes to write to disk: base64-decoded when the metadata says so, raw otherwise.
    pub fn decode(&self) -> Result<Vec<u8>, ApiError> {
        if !self.is_base64() {
            return Ok(self.payload.as_bytes().to_vec());
        }
        STANDARD
            .decode(self.payload.trim())
            .map_err(|e| ApiError::MalformedPayload(format!("Invalid base64 image data: {e}")))
    }
}
