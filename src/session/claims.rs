use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Role, User};

/// URL-safe alphabet, padding optional. Standard-alphabet input is mapped onto it first.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("el token debe tener tres partes separadas por puntos, tiene {0}")]
    Shape(usize),

    #[error("el contenido del token no es base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("el contenido del token no es un JSON de claims válido: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("el claim '{0}' del token está vacío")]
    Empty(&'static str),

    #[error("el token tiene un rol desconocido '{0}'")]
    UnknownRole(String),
}

/// Identity claims carried in the token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TokenClaims {
    pub fn into_user(self) -> Result<User, ClaimsError> {
        if self.user_id.is_empty() {
            return Err(ClaimsError::Empty("userId"));
        }
        if self.email.is_empty() {
            return Err(ClaimsError::Empty("email"));
        }
        let role = Role::parse(&self.role).ok_or(ClaimsError::UnknownRole(self.role))?;

        Ok(User {
            id: self.user_id,
            email: self.email,
            name: self.name.unwrap_or_default(),
            role,
            created_at: String::new(),
            updated_at: String::new(),
        })
    }
}

/// Read the payload without checking the header, signature or expiry.
///
/// The server remains the only authority on whether the token is valid; this
/// only recovers who the user was for display and routing.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ClaimsError::Shape(parts.len()));
    }

    let payload: String = parts[1]
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Claims decoded straight into a session user.
pub fn user_from_token(token: &str) -> Result<User, ClaimsError> {
    decode_claims(token)?.into_user()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn sign(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    #[test]
    fn decodes_without_knowing_the_secret() {
        let token = sign(json!({"userId": "u1", "email": "doctor@test.com", "role": "doctor", "exp": 1}));
        let user = user_from_token(&token).unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.name, "");
    }

    #[test]
    fn header_is_never_inspected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"userId":"a1","email":"admin@test.com","role":"admin"}"#);
        let user = user_from_token(&format!("{}.{}.sig", header, payload)).unwrap();

        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn padded_standard_alphabet_payload_is_accepted() {
        // 52 bytes of JSON: encodes with "==" padding.
        let claims = br#"{"userId":"u1","email":"d@test.com","role":"doctor"}"#;
        let payload = STANDARD.encode(claims);
        assert!(payload.ends_with('='));

        let token = format!("{}.{}.sig", URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#), payload);
        assert_eq!(decode_claims(&token).unwrap().email, "d@test.com");
    }

    #[test]
    fn missing_role_is_rejected() {
        let token = sign(json!({"userId": "u1", "email": "doctor@test.com"}));
        assert!(matches!(user_from_token(&token), Err(ClaimsError::Payload(_))));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let token = sign(json!({"userId": "u1", "email": "a@test.com", "role": "nurse"}));
        assert!(matches!(user_from_token(&token), Err(ClaimsError::UnknownRole(r)) if r == "nurse"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(decode_claims("not-a-token"), Err(ClaimsError::Shape(1))));
        assert!(matches!(decode_claims("a.b.c.d"), Err(ClaimsError::Shape(4))));
        assert!(matches!(decode_claims("a.!!.c"), Err(ClaimsError::Encoding(_))));
        assert!(matches!(decode_claims("a.bm90LWpzb24.c"), Err(ClaimsError::Payload(_))));
    }
}
