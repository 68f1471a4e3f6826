use super::SecurityContext;
use crate::records::RecordError;
use charachat_domain::config::{ApiConfig, SessionConfig};
use charachat_domain::constants::KEY_COOKIE;
use charachat_vault::FieldKey;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use tracing::debug;

/// Reads the field key from the `key` session cookie and writes the cookie at login.
///
/// The key lives only in that cookie. It is resolved per request and never cached in
/// the process.
#[derive(Debug, Clone)]
pub struct KeyProvider {
    max_age_secs: u64,
    secure: bool,
    compression: bool,
}

impl KeyProvider {
    #[must_use]
    pub const fn new(session: &SessionConfig, compression: bool) -> Self {
        Self { max_age_secs: session.cookie_max_age_secs, secure: session.secure, compression }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.security.session, config.records.compression)
    }

    /// Returns the session key carried by any of the given `Cookie` header values.
    ///
    /// # Errors
    /// Returns [`RecordError::MissingKey`] if no `key` cookie is present or its value is
    /// not a hex-encoded 32-byte key.
    pub fn get_key<'a, I>(&self, cookie_headers: I) -> Result<FieldKey, RecordError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let value = cookie_headers
            .into_iter()
            .find_map(|header| cookie_value(header, KEY_COOKIE))
            .ok_or_else(RecordError::missing_key)?;

        FieldKey::from_hex(&value).map_err(|e| {
            debug!(error = %e, "Ignoring undecodable key cookie");
            RecordError::MissingKey {
                message: "Session key is malformed".into(),
                context: None,
            }
        })
    }

    /// Resolves the [`SecurityContext`] for a request; anonymous when there is no usable key.
    ///
    /// # Errors
    /// Returns [`RecordError::Cipher`] only if a present key cannot be expanded.
    pub fn context<'a, I>(&self, cookie_headers: I) -> Result<SecurityContext, RecordError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self.get_key(cookie_headers) {
            Ok(key) => SecurityContext::for_key(&key, self.compression),
            Err(RecordError::MissingKey { .. }) => Ok(SecurityContext::anonymous()),
            Err(e) => Err(e),
        }
    }

    /// `Set-Cookie` value that stores `key` for the session.
    #[must_use]
    pub fn issue_cookie(&self, key: &FieldKey) -> String {
        self.cookie(&key.to_hex(), self.max_age_secs)
    }

    /// `Set-Cookie` value that removes the key (logout).
    #[must_use]
    pub fn clear_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age_secs: u64) -> String {
        let max_age = Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX));
        Cookie::build((KEY_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(max_age)
            .build()
            .to_string()
    }
}

/// Finds `name` in one `Cookie` header (`a=1; b=2`). Empty values count as absent.
fn cookie_value(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> KeyProvider {
        KeyProvider::new(&SessionConfig::default(), false)
    }

    #[test]
    fn reads_key_among_other_cookies() {
        let key = FieldKey::from_bytes([9u8; 32]);
        let header = format!("theme=dark; key={}; lang=en", key.to_hex());

        let resolved = provider().get_key([header.as_str()]).unwrap();
        assert_eq!(resolved.to_hex(), key.to_hex());
    }

    #[test]
    fn searches_every_cookie_header() {
        let key = FieldKey::from_bytes([1u8; 32]);
        let second = format!("key={}", key.to_hex());

        let resolved = provider().get_key(["theme=dark", second.as_str()]).unwrap();
        assert_eq!(resolved.to_hex(), key.to_hex());
    }

    #[test]
    fn absent_or_malformed_key_is_missing() {
        for headers in [vec![], vec!["theme=dark"], vec!["key="], vec!["key=zz"], vec!["key=abcd"]] {
            let err = provider().get_key(headers).unwrap_err();
            assert!(matches!(err, RecordError::MissingKey { .. }));
        }
    }

    #[test]
    fn prefix_named_cookie_is_not_the_key() {
        let key = FieldKey::from_bytes([1u8; 32]);
        let header = format!("apikey={}", key.to_hex());
        assert!(provider().get_key([header.as_str()]).is_err());
    }

    #[test]
    fn context_is_anonymous_without_key() {
        let ctx = provider().context(["theme=dark"]).unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn cookie_attributes() {
        let key = FieldKey::from_bytes([7u8; 32]);
        let cookie = provider().issue_cookie(&key);

        let parsed = Cookie::parse(cookie.as_str()).unwrap();
        assert_eq!(parsed.name(), "key");
        assert_eq!(parsed.value(), key.to_hex());
        assert_eq!(parsed.http_only(), Some(true));
        assert_eq!(parsed.secure(), Some(true));
        assert_eq!(parsed.same_site(), Some(SameSite::Strict));
        assert_eq!(parsed.path(), Some("/"));
        assert_eq!(parsed.max_age(), Some(Duration::seconds(31_536_000)));

        let insecure = KeyProvider::new(&SessionConfig { secure: false, ..SessionConfig::default() }, false);
        let cleared = Cookie::parse(insecure.clear_cookie()).unwrap();
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.secure(), None);
        assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn tolerates_loose_cookie_spacing() {
        let key = FieldKey::from_bytes([3u8; 32]);
        let header = format!("theme=dark;key={} ;  lang=en", key.to_hex());

        let resolved = provider().get_key([header.as_str()]).unwrap();
        assert_eq!(resolved.to_hex(), key.to_hex());
    }
}
