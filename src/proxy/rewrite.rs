//! API-description document rewriting.
//!
//! Backends publish OpenAPI documents whose `servers` entries point at
//! themselves. Documents fetched through the gateway get a single `servers`
//! entry pointing at the gateway instead. This is cosmetic: any failure
//! returns the original bytes untouched.

use axum::body::Bytes;
use serde_json::{json, Value};

/// Replace the document's `servers` array with `[{"url": gateway_url}]`.
///
/// Returns the input unchanged when it is not a JSON object.
pub fn rewrite_servers(document: &Bytes, gateway_url: &str) -> Bytes {
    let mut root = match serde_json::from_slice::<Value>(document) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!("API description is not a JSON object; passing through");
            return document.clone();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse API description; passing through");
            return document.clone();
        }
    };

    root.retain(|key, _| key != "servers");
    root.insert("servers".to_string(), json!([{ "url": gateway_url }]));

    match serde_json::to_vec(&Value::Object(root)) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize API description; passing through");
            document.clone()
        }
    }
}
