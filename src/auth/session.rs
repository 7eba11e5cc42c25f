use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Admin, StudentSession};

/// Sessions expire a fixed 24 hours after issue; expiry is the only
/// termination mechanism, tokens are not revocable server-side.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

/// Signed session claims. The decoded claims are the request's principal
/// verbatim; nothing is re-fetched from the store while a token is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub exp: usize,
}

/// Signs and verifies session tokens (HS256).
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    fn expiry() -> usize {
        (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize
    }

    pub fn sign_admin(&self, admin: &Admin) -> Result<String> {
        let claims = Claims {
            sub: admin.id.clone(),
            name: admin.name.clone(),
            role: Role::Admin,
            email: Some(admin.email.clone()),
            branch: None,
            exp: Self::expiry(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn sign_student(&self, session: &StudentSession) -> Result<String> {
        let claims = Claims {
            sub: session.id.clone(),
            name: session.name.clone(),
            role: Role::Student,
            email: None,
            branch: Some(session.branch.clone()),
            exp: Self::expiry(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| Error::InvalidToken)
    }
}
