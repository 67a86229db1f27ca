use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

use super::token::{token_clear, token_set};
use crate::error::ApiError;
use crate::models::LoginRequest;
use crate::network::ApiClient;

/// Decode the payload segment of a JWT. The signature is not checked; the
/// backend does that on every request.
pub fn decode_claims(token: &str) -> Result<Value, ApiError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::Decode("token is not a JWT".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ApiError::Decode(format!("token payload: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn login(body: &Value, params: &[(&str, String)]) -> Result<String, ApiError> {
    ApiClient::login(body, params).await
}

pub async fn renew(params: &[(&str, String)]) -> Result<String, ApiError> {
    ApiClient::renew(params).await
}

pub fn logout() {
    token_clear();
}

fn store(token: &str) -> Result<Value, ApiError> {
    let claims = decode_claims(token)?;
    token_set(token, &claims)?;
    Ok(claims)
}

/// Log in and cache the token with its claims.
pub async fn login_and_store(request: &LoginRequest) -> Result<Value, ApiError> {
    let body = serde_json::to_value(request)?;
    let token = login(&body, &[]).await?;
    store(&token)
}

/// Swap the cached token for a fresh one.
pub async fn renew_and_store() -> Result<Value, ApiError> {
    let token = renew(&[]).await?;
    store(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt(payload: &Value) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    #[test]
    fn decodes_payload_claims() {
        let claims = json!({"user": "admin", "admin": true, "exp": 1700000000});
        assert_eq!(decode_claims(&jwt(&claims)).unwrap(), claims);
    }

    #[test]
    fn tolerates_padded_payload() {
        let padded = format!("h.{}.s", base64::engine::general_purpose::URL_SAFE.encode(r#"{"a":1}"#));
        assert_eq!(decode_claims(&padded).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn rejects_non_jwt() {
        assert!(matches!(decode_claims("opaque"), Err(ApiError::Decode(_))));
        assert!(matches!(decode_claims("a.!!!.c"), Err(ApiError::Decode(_))));
    }
}
