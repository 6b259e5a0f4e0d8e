use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // User id
    pub role: UserRole, // Authorization role
    pub exp: i64,       // Expiration time
    pub iat: i64,       // Issued at
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        }
    }

    pub fn generate_token(&self, user_id: Uuid, role: UserRole) -> anyhow::Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiry_seconds as i64);

        let claims = Claims {
            sub: user_id,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> anyhow::Result<Claims> {
        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 3600);
        let user_id = Uuid::new_v4();

        let token = manager.generate_token(user_id, UserRole::User).unwrap();
        let claims = manager.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::User);
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let manager = JwtManager::new("secret_a", 3600);
        let token = manager
            .generate_token(Uuid::new_v4(), UserRole::Admin)
            .unwrap();

        let other = JwtManager::new("secret_b", 3600);
        assert!(other.verify_token(&token).is_err());
    }
}
