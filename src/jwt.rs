//! JWT issuance and validation plus the axum extractor for bearer claims.

use std::sync::LazyLock;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{PlayerEntity, Role},
    error::{AppError, ServiceError},
};

/// Session lifetime of an issued token.
const TOKEN_VALIDITY_HOURS: i64 = 24 * 7;

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Player account id.
    pub sub: i64,
    /// Login email at issuance time.
    pub email: String,
    /// Role at issuance time; the admin gate checks this.
    pub role: Role,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// Single authorization gate: fail with `Forbidden` unless the caller is
    /// an administrator.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("admin access required".into()))
        }
    }
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized("missing bearer token".into()))?;

        let token_data = decode::<Claims>(bearer.token(), &KEYS.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized("invalid token".into()))?;

        Ok(token_data.claims)
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = read_or_generate_secret();
    Keys::new(&secret)
});

fn read_or_generate_secret() -> Vec<u8> {
    if let Ok(secret) = std::env::var("POKER_JWT_SECRET") {
        secret.as_bytes().to_vec()
    } else {
        warn!("POKER_JWT_SECRET not set; generating a random secret, sessions will not survive restarts");
        Uuid::new_v4().as_bytes().to_vec()
    }
}

/// Issue a session token for the given account.
pub fn generate_token(player: &PlayerEntity) -> Result<String, ServiceError> {
    let claims = Claims {
        sub: player.id,
        email: player.email.clone(),
        role: player.role,
        exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp()
            as usize,
    };
    encode(&Header::default(), &claims, &KEYS.encoding)
        .map_err(|err| ServiceError::Internal(format!("token encoding failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn player(role: Role) -> PlayerEntity {
        PlayerEntity {
            id: 7,
            name: "Dana".into(),
            email: "dana@poker.com".into(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_claims_through_a_token() {
        let token = generate_token(&player(Role::Player)).expect("token");
        let decoded = decode::<Claims>(&token, &KEYS.decoding, &Validation::default())
            .expect("decodes")
            .claims;
        assert_eq!(decoded.sub, 7);
        assert_eq!(decoded.email, "dana@poker.com");
        assert_eq!(decoded.role, Role::Player);
    }

    #[test]
    fn admin_gate_rejects_players() {
        let claims = Claims {
            sub: 1,
            email: "p@poker.com".into(),
            role: Role::Player,
            exp: 0,
        };
        assert!(matches!(
            claims.require_admin(),
            Err(ServiceError::Forbidden(_))
        ));

        let admin = Claims {
            role: Role::Admin,
            ..claims
        };
        assert!(admin.require_admin().is_ok());
    }
}
