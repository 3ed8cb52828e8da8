use crate::util::errors::ClassifierError;
use serde_json::Value;

/// Human-readable message of a non-2xx response: the JSON `detail` field,
/// else the plain-text body, else `Erro {status}`.
pub fn extract_error_detail(status: u16, body: &[u8]) -> String {
    let fallback = format!("Erro {}", status);

    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return match value.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => fallback,
            // FastAPI validation errors carry a list here
            Some(other) => other.to_string(),
        };
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

/// Typed error for a non-2xx status.
pub fn status_error(status: u16, detail: String) -> ClassifierError {
    match status {
        500..=599 => ClassifierError::ServerStatus { status, detail },
        400..=499 => ClassifierError::ClientStatus { status, detail },
        _ => ClassifierError::InvalidResponse(detail),
    }
}
