use async_trait::async_trait;
use jsonwebtoken::dangerous::insecure_decode;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::model::AuthenticatedUser;
use crate::core::config::SsoConfig;

/// Claims checked, in order, for the user id
const USER_ID_CLAIMS: [&str; 3] = ["user_id", "sub", "id"];

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Token is not a decodable JWT: {0}")]
    MalformedToken(String),

    #[error("Token carries no user id claim")]
    MissingUserId,

    #[error("SSO rejected the token with HTTP {0}")]
    Rejected(u16),

    #[error("SSO could not be reached: {0}")]
    Unreachable(String),
}

/// Maps a bearer token to the caller's identity
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, IdentityError>;
}

#[derive(Debug, Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

struct CachedIdentity {
    user_id: String,
    resolved_at: Instant,
}

/// Resolves tokens against the external SSO verification endpoint
///
/// The user id is read from the token's unverified claims; the SSO answering
/// 200 is what makes it trustworthy. Positive results are cached for the
/// configured TTL, keyed by a SHA-256 digest of the token.
pub struct SsoIdentityResolver {
    verify_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, CachedIdentity>>>,
    cache_ttl: Duration,
}

impl SsoIdentityResolver {
    pub fn new(config: &SsoConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        Ok(Self {
            verify_url: config.verify_url(),
            client,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl: config.cache_ttl,
        })
    }

    fn cache_key(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    async fn cached(&self, key: &str) -> Option<String> {
        let cache = self.cache.read().await;
        cache
            .get(key)
            .filter(|entry| entry.resolved_at.elapsed() < self.cache_ttl)
            .map(|entry| entry.user_id.clone())
    }

    async fn remember(&self, key: String, user_id: String) {
        let mut cache = self.cache.write().await;
        let ttl = self.cache_ttl;
        cache.retain(|_, entry| entry.resolved_at.elapsed() < ttl);
        cache.insert(
            key,
            CachedIdentity {
                user_id,
                resolved_at: Instant::now(),
            },
        );
    }

    async fn verify_with_sso(&self, token: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(&self.verify_url)
            .bearer_auth(token)
            .json(&VerifyTokenRequest { token })
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(IdentityError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}

/// Read the user id from a JWT payload without checking its signature
fn user_id_from_claims(token: &str) -> Result<String, IdentityError> {
    let claims = insecure_decode::<HashMap<String, Value>>(token)
        .map_err(|e| IdentityError::MalformedToken(e.to_string()))?
        .claims;

    USER_ID_CLAIMS
        .iter()
        .find_map(|name| match claims.get(*name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        })
        .ok_or(IdentityError::MissingUserId)
}

#[async_trait]
impl IdentityResolver for SsoIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, IdentityError> {
        let key = Self::cache_key(token);
        if let Some(user_id) = self.cached(&key).await {
            tracing::debug!("Using cached SSO identity for user {}", user_id);
            return Ok(AuthenticatedUser::new(user_id));
        }

        let user_id = user_id_from_claims(token)?;
        self.verify_with_sso(token).await?;

        tracing::debug!("SSO verified token for user {}", user_id);
        self.remember(key, user_id.clone()).await;

        Ok(AuthenticatedUser::new(user_id))
    }
}
