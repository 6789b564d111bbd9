//! Per-actor API credentials.
//!
//! Every write against the destination is performed as the actor that
//! originally authored the entity (milestone creator, issue author, comment
//! author). Each actor has its own rate-limit bucket, so routing calls through
//! the author's credential spreads one sequential stream of requests across
//! several buckets. Actors without a credential fall back to the default actor.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while building a [`CredentialPool`].
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The default actor has no credential, so fallback would be impossible.
    #[error("No credential configured for default actor '{actor}'")]
    MissingDefaultActor { actor: String },

    /// A credential was configured with an empty token.
    #[error("Empty token configured for actor '{actor}'")]
    EmptyToken { actor: String },
}

/// An API token bound to the actor it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    actor: String,
    token: String,
}

impl Credential {
    /// Creates a credential for `actor`.
    pub fn new(actor: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            token: token.into(),
        }
    }

    /// Returns the actor this credential acts as.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Returns the raw API token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("actor", &self.actor)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Maps actor names to credentials, with a default actor for fallback.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: BTreeMap<String, Credential>,
    default: Credential,
}

impl CredentialPool {
    /// Builds a pool from `(actor, token)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if a token is empty or `default_actor` has
    /// no token, since [`resolve`](Self::resolve) must never fail.
    pub fn new<I, A, T>(tokens: I, default_actor: &str) -> Result<Self, CredentialError>
    where
        I: IntoIterator<Item = (A, T)>,
        A: Into<String>,
        T: Into<String>,
    {
        let mut credentials = BTreeMap::new();
        for (actor, token) in tokens {
            let credential = Credential::new(actor, token);
            if credential.token.trim().is_empty() {
                return Err(CredentialError::EmptyToken {
                    actor: credential.actor,
                });
            }
            credentials.insert(credential.actor.clone(), credential);
        }

        let default = credentials.get(default_actor).cloned().ok_or_else(|| {
            CredentialError::MissingDefaultActor {
                actor: default_actor.to_string(),
            }
        })?;

        Ok(Self {
            credentials,
            default,
        })
    }

    /// Returns the credential for `actor`, or the default actor's credential
    /// when `actor` has none.
    pub fn resolve(&self, actor: &str) -> &Credential {
        match self.credentials.get(actor) {
            Some(credential) => credential,
            None => {
                debug!(actor, fallback = %self.default.actor, "No credential for actor, using default");
                &self.default
            }
        }
    }

    /// Returns the default actor's credential.
    pub fn default_credential(&self) -> &Credential {
        &self.default
    }

    /// Returns true if `actor` has its own credential.
    pub fn contains(&self, actor: &str) -> bool {
        self.credentials.contains_key(actor)
    }

    /// Iterates over every configured credential.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.values()
    }

    /// Number of configured credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Returns true if no credentials are configured.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
