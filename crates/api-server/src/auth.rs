use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Hash a token with SHA-256 so lookups compare fixed-length digests
/// instead of the raw secret.
fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;

/// Shared-secret allow-list checked against the `token` request parameter.
///
/// Built once at startup and never mutated. An empty list means open access.
#[derive(Debug, Clone, Default)]
pub struct TokenAllowlist {
    hashes: HashSet<String>,
}

impl TokenAllowlist {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hashes: tokens
                .into_iter()
                .filter(|t| !t.as_ref().is_empty())
                .map(|t| hash_key(t.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Accept the request if auth is disabled or `token` is on the list.
    pub fn verify(&self, token: Option<&str>) -> Result<(), AuthError> {
        if self.is_empty() {
            return Ok(());
        }

        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::MissingToken),
        };

        if !self.hashes.contains(&hash_key(token)) {
            tracing::warn!("Invalid token attempted: {}", mask_token(token));
            return Err(AuthError::InvalidToken);
        }

        tracing::debug!("Valid token: {}", mask_token(token));
        Ok(())
    }
}

/// Mask a token for logging (first 4 and last 4 characters).
pub(crate) fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Authentication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing token"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for AuthError {}
