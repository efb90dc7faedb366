//! Signed guest token codec.
//!
//! Guest state (cart, saved checkout profile, order-id list) never touches a
//! server-side session store: each concern lives in its own client-held
//! cookie, and the cookie value is an HMAC-signed, expiring token. This
//! module is the single place where those tokens are encoded, signed,
//! verified, and turned into `Set-Cookie` headers.
//!
//! Token wire format: `base64url(json) . expiry-unix-seconds . base64url(mac)`
//! where the MAC covers both the payload and the expiry. Decoding fails soft
//! by design - a missing, tampered, or expired token reads as "no state".

use axum::http::{HeaderMap, header::COOKIE};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Cookie names, one per guest concern.
pub mod cookies {
    /// The guest's cart line items.
    pub const CART: &str = "zed_cart";

    /// Saved "remember me" checkout profile.
    pub const CHECKOUT_PROFILE: &str = "zed_checkout";

    /// Order ids this guest may view.
    pub const ORDERS: &str = "zed_orders";
}

/// Cart retention window: one week.
pub const CART_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Checkout profile and order-list retention window: three weeks.
pub const PROFILE_TTL_SECONDS: i64 = 21 * 24 * 60 * 60;

/// Encodes and decodes signed guest tokens and renders them as cookies.
#[derive(Clone)]
pub struct TokenCodec {
    secret: SecretString,
    secure: bool,
}

impl TokenCodec {
    /// Create a codec signing with `secret`.
    ///
    /// `secure` controls the cookie `Secure` attribute (https deployments).
    #[must_use]
    pub const fn new(secret: SecretString, secure: bool) -> Self {
        Self { secret, secure }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length")
    }

    /// Encode and sign `value`, valid for `ttl_seconds` from now.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized to JSON.
    pub fn encode<T: Serialize>(
        &self,
        value: &T,
        ttl_seconds: i64,
    ) -> Result<String, serde_json::Error> {
        let expires_at = chrono::Utc::now().timestamp() + ttl_seconds;
        self.encode_with_expiry(value, expires_at)
    }

    fn encode_with_expiry<T: Serialize>(
        &self,
        value: &T,
        expires_at: i64,
    ) -> Result<String, serde_json::Error> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?);
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.update(b".");
        mac.update(expires_at.to_string().as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{expires_at}.{signature}"))
    }

    /// Verify and decode a token.
    ///
    /// Returns `None` for any malformed, tampered, or expired token; guest
    /// state is never allowed to produce a hard error, the worst case is
    /// starting over empty.
    #[must_use]
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Option<T> {
        let mut parts = token.splitn(3, '.');
        let payload = parts.next()?;
        let expiry = parts.next()?;
        let signature = parts.next()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.update(b".");
        mac.update(expiry.as_bytes());
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        // Constant-time comparison.
        mac.verify_slice(&signature).ok()?;

        let expires_at = expiry.parse::<i64>().ok()?;
        if expires_at < chrono::Utc::now().timestamp() {
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Read and decode the named token from a request's `Cookie` headers.
    ///
    /// Fails soft exactly like [`Self::decode`].
    #[must_use]
    pub fn read<T: DeserializeOwned>(&self, headers: &HeaderMap, name: &str) -> Option<T> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value.to_owned()))
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .and_then(|cookie| self.decode(cookie.value()))
    }

    /// Encode `value` into a full `Set-Cookie` header value, renewing the
    /// token's expiry window.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized to JSON.
    pub fn write<T: Serialize>(
        &self,
        name: &'static str,
        value: &T,
        ttl_seconds: i64,
    ) -> Result<String, serde_json::Error> {
        let token = self.encode(value, ttl_seconds)?;
        Ok(self.cookie(name, token, ttl_seconds).to_string())
    }

    /// A `Set-Cookie` header value that removes the named token.
    #[must_use]
    pub fn clear(&self, name: &'static str) -> String {
        self.cookie(name, String::new(), 0).to_string()
    }

    fn cookie(&self, name: &'static str, token: String, ttl_seconds: i64) -> Cookie<'static> {
        Cookie::build((name, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::seconds(ttl_seconds))
            .build()
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .field("secure", &self.secure)
            .finish()
    }
}
