//! Login token cache in `localStorage`.
//!
//! The entry under [`TOKEN_STORAGE_KEY`] is a JSON object
//! `{"token": "<jwt>", "claims": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_sys::Storage;

use crate::constants::TOKEN_STORAGE_KEY;
use crate::error::ApiError;
use crate::network::ApiClient;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(default)]
    pub token: Value,
    #[serde(default)]
    pub claims: Value,
}

fn local_storage() -> Result<Storage, ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::Js("no global window exists".to_string()))?;
    window
        .local_storage()?
        .ok_or_else(|| ApiError::Js("no local storage exists".to_string()))
}

/// Validate a raw storage entry and split it into token and claims.
pub fn parse_stored_token(raw: Option<&str>) -> Result<(String, Value), ApiError> {
    let raw = raw.ok_or(ApiError::TokenNotFound)?;
    let value: Value = serde_json::from_str(raw).map_err(|e| ApiError::TokenCorrupt(e.to_string()))?;

    let token = match value.get("token") {
        Some(Value::String(t)) if !t.is_empty() => t.clone(),
        _ => return Err(ApiError::TokenNotDefined),
    };
    let claims = value.get("claims").cloned().unwrap_or(Value::Null);

    Ok((token, claims))
}

pub fn encode_stored_token(token: &str, claims: &Value) -> Result<String, ApiError> {
    let entry = StoredToken {
        token: Value::String(token.to_string()),
        claims: claims.clone(),
    };
    Ok(serde_json::to_string(&entry)?)
}

pub fn token_set(token: &str, claims: &Value) -> Result<(), ApiError> {
    let data = encode_stored_token(token, claims)?;
    local_storage()?.set_item(TOKEN_STORAGE_KEY, &data)?;
    Ok(())
}

pub fn token_get() -> Result<(String, Value), ApiError> {
    let raw = local_storage()?.get_item(TOKEN_STORAGE_KEY)?;
    parse_stored_token(raw.as_deref())
}

pub fn token_clear() {
    match local_storage() {
        Ok(storage) => {
            if let Err(e) = storage.remove_item(TOKEN_STORAGE_KEY) {
                web_sys::console::warn_2(&"failed to clear token".into(), &e);
            }
        }
        Err(e) => web_sys::console::warn_1(&format!("failed to clear token: {}", e).into()),
    }
}

/// Ask the backend whether `token` is still valid.
pub async fn token_check(token: &str) -> Result<(), ApiError> {
    ApiClient::token_check(token).await
}

/// True when a token is stored and the backend accepts it. Any failure
/// drops the stored token.
pub async fn token_condition() -> bool {
    let result = match token_get() {
        Ok((token, _)) => token_check(&token).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            crate::debug_log!("token rejected: {}", e);
            token_clear();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_entry() {
        assert!(matches!(parse_stored_token(None), Err(ApiError::TokenNotFound)));
    }

    #[test]
    fn corrupt_entry() {
        assert!(matches!(parse_stored_token(Some("{not json")), Err(ApiError::TokenCorrupt(_))));
    }

    #[test]
    fn empty_or_absent_token() {
        for raw in [r#"{"claims":{}}"#, r#"{"token":""}"#, r#"{"token":null}"#, "42"] {
            assert!(
                matches!(parse_stored_token(Some(raw)), Err(ApiError::TokenNotDefined)),
                "{raw}"
            );
        }
    }

    #[test]
    fn stored_entry_round_trips() {
        let claims = json!({"sub": "admin", "exp": 1700000000});
        let raw = encode_stored_token("jwt.abc.def", &claims).unwrap();
        let (token, parsed) = parse_stored_token(Some(&raw)).unwrap();
        assert_eq!(token, "jwt.abc.def");
        assert_eq!(parsed, claims);
    }
}
