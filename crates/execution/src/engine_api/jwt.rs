// Engine API authentication: HS256 tokens carrying only an `iat` claim.
// Engines reject tokens whose `iat` is more than 60s away from their clock, so
// the cached token is regenerated shortly before that window closes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::ExecutionError;

const TOKEN_VALIDITY_DURATION: Duration = Duration::from_secs(55);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iat: u64,
}

#[derive(Clone)]
struct JwtCache {
    token: String,
    created_at: SystemTime,
}

impl JwtCache {
    fn is_fresh(&self) -> bool {
        // A clock that went backwards makes the token suspect; regenerate.
        self.created_at.elapsed().map(|age| age < TOKEN_VALIDITY_DURATION).unwrap_or(false)
    }
}

/// Provides JWT tokens for authenticating with the Engine API.
pub struct JwtProvider {
    key: jsonwebtoken::EncodingKey,
    cache: RwLock<Option<JwtCache>>,
}

impl JwtProvider {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { key: jsonwebtoken::EncodingKey::from_secret(&secret), cache: RwLock::new(None) }
    }

    /// Returns a valid JWT token, either from the cache or by generating a new one.
    pub async fn get_token(&self) -> Result<String, ExecutionError> {
        {
            let cached_guard = self.cache.read().await;
            if let Some(cached) = cached_guard.as_ref() &&
                cached.is_fresh()
            {
                return Ok(cached.token.clone());
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed it while we waited for the write lock.
        if let Some(cached) = cache.as_ref() &&
            cached.is_fresh()
        {
            return Ok(cached.token.clone());
        }

        let now = SystemTime::now();
        let iat = now
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ExecutionError::Jwt(e.to_string()))?
            .as_secs();
        let token = encode(&Header::default(), &Claims { iat }, &self.key)
            .map_err(|e| ExecutionError::Jwt(e.to_string()))?;

        cache.replace(JwtCache { token: token.clone(), created_at: now });

        Ok(token)
    }
}
