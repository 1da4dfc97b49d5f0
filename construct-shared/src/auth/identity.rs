/// Federated identity verification
///
/// Federated login sends a third-party ID token. This module checks that
/// token against the provider's published signing keys and extracts the
/// email the provider vouches for.
///
/// [`IdentityVerifier`] is the seam; [`GoogleIdentityVerifier`] is the
/// production implementation. Tests substitute their own verifier.
///
/// # Example
///
/// ```no_run
/// use construct_shared::auth::identity::{GoogleIdentityVerifier, IdentityVerifier};
///
/// # async fn example(id_token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let verifier = GoogleIdentityVerifier::new();
/// let claims = verifier.validate(id_token, "my-client-id.apps.googleusercontent.com").await?;
/// println!("verified {:?}", claims.email);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Google's JSON Web Key Set endpoint
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuers Google uses for ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Error type for identity verification
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token failed signature, audience, issuer or expiry checks
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    /// The provider's signing keys could not be fetched
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Claims extracted from a verified ID token
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentityClaims {
    /// Provider-side subject id
    pub sub: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub email_verified: Option<bool>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Verifies ID tokens issued by an external identity provider
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Validates `id_token` for the given `audience` and returns its claims
    async fn validate(&self, id_token: &str, audience: &str)
        -> Result<IdentityClaims, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

/// Verifies Google-issued ID tokens (RS256)
#[derive(Debug, Clone)]
pub struct GoogleIdentityVerifier {
    http: reqwest::Client,
    certs_url: String,
}

impl GoogleIdentityVerifier {
    pub fn new() -> Self {
        Self::with_certs_url(GOOGLE_CERTS_URL)
    }

    pub fn with_certs_url(certs_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            certs_url: certs_url.into(),
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, IdentityError> {
        self.http
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| IdentityError::ProviderUnavailable(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| IdentityError::ProviderUnavailable(e.to_string()))
    }
}

impl Default for GoogleIdentityVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn validate(
        &self,
        id_token: &str,
        audience: &str,
    ) -> Result<IdentityClaims, IdentityError> {
        let header =
            decode_header(id_token).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".to_string()))?;

        let keys = self.fetch_keys().await?;
        let jwk = keys
            .keys
            .iter()
            .find(|k| k.kid == kid)
            .ok_or_else(|| IdentityError::InvalidToken(format!("unknown key id {}", kid)))?;

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&GOOGLE_ISSUERS[..]);

        let data = decode::<IdentityClaims>(id_token, &key, &validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        tracing::debug!(sub = %data.claims.sub, "Federated identity token verified");

        Ok(data.claims)
    }
}
