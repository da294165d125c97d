//! Persisted auth state: bearer token and user profile.
//!
//! Both values live in a [`KeyValueStore`] and are mirrored into cookies of
//! the same name so navigation-time gating can read them. Nothing here
//! verifies the token; it is an opaque string handed to the API.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{HireTrackError, Result};
use crate::storage::KeyValueStore;
use crate::types::UserProfile;

pub const TOKEN_KEY: &str = "hiretrack_token";
pub const USER_KEY: &str = "hiretrack_user";

/// Cookie lifetime: seven days.
pub const COOKIE_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// Token and profile accessors over a shared store.
#[derive(Clone)]
pub struct AuthStore {
    store: Arc<dyn KeyValueStore>,
}

impl AuthStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a signed-in session.
    pub fn save_session(&self, token: &str, user: &UserProfile) -> Result<()> {
        if token.trim().is_empty() {
            return Err(HireTrackError::Validation("token is required".to_string()));
        }
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        debug!(user_id = %user.id, user_type = %user.user_type, "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// Read the token straight from the store.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn user(&self) -> Result<Option<UserProfile>> {
        match self.store.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.token()?.is_some())
    }

    /// `Set-Cookie` values mirroring the stored session.
    pub fn cookies(&self) -> Result<Vec<String>> {
        let mut cookies = Vec::new();
        if let Some(token) = self.token()? {
            cookies.push(set_cookie(TOKEN_KEY, &token));
        }
        if let Some(raw) = self.store.get(USER_KEY)? {
            cookies.push(set_cookie(USER_KEY, &raw));
        }
        Ok(cookies)
    }

    /// `Set-Cookie` values that expire both session cookies.
    pub fn clear_cookies() -> Vec<String> {
        [TOKEN_KEY, USER_KEY]
            .iter()
            .map(|name| format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name))
            .collect()
    }
}

fn set_cookie(name: &str, value: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        name,
        urlencoding::encode(value),
        COOKIE_MAX_AGE_SECS
    )
}

/// Split a `Cookie` request header into decoded name/value pairs.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let value = urlencoding::decode(value.trim())
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.trim().to_string());
            Some((name.trim().to_string(), value))
        })
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// The profile declared by the user cookie, if present and well-formed.
pub fn profile_from_cookies(header: &str) -> Option<UserProfile> {
    let cookies = parse_cookie_header(header);
    let raw = cookies.get(USER_KEY).filter(|v| !v.is_empty())?;
    match serde_json::from_str(raw) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed user cookie");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::UserType;

    fn recruiter() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            user_type: UserType::Recruiter,
        }
    }

    fn store() -> AuthStore {
        AuthStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn session_round_trip() {
        let auth = store();
        assert!(!auth.is_authenticated().unwrap());

        auth.save_session("tok-1", &recruiter()).unwrap();
        assert_eq!(auth.token().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(auth.user().unwrap(), Some(recruiter()));

        auth.clear().unwrap();
        assert_eq!(auth.token().unwrap(), None);
        assert_eq!(auth.user().unwrap(), None);
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(matches!(
            store().save_session(" ", &recruiter()),
            Err(HireTrackError::Validation(_))
        ));
    }

    #[test]
    fn cookies_expire_in_seven_days() {
        let auth = store();
        auth.save_session("tok 1", &recruiter()).unwrap();

        let cookies = auth.cookies().unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], "hiretrack_token=tok%201; Path=/; Max-Age=604800; SameSite=Lax");
        assert!(cookies[1].starts_with("hiretrack_user=%7B"));
        assert!(cookies[1].ends_with("Max-Age=604800; SameSite=Lax"));
    }

    #[test]
    fn cleared_cookies_have_zero_max_age() {
        for cookie in AuthStore::clear_cookies() {
            assert!(cookie.contains("Max-Age=0"));
        }
    }

    #[test]
    fn profile_survives_cookie_round_trip() {
        let auth = store();
        auth.save_session("tok", &recruiter()).unwrap();

        let header = auth
            .cookies()
            .unwrap()
            .iter()
            .map(|c| c.split(';').next().unwrap().to_string())
            .collect::<Vec<_>>()
            .join("; ");

        assert_eq!(profile_from_cookies(&header), Some(recruiter()));
        assert_eq!(parse_cookie_header(&header).get(TOKEN_KEY).map(String::as_str), Some("tok"));
    }

    #[test]
    fn malformed_profile_cookie_is_ignored() {
        assert_eq!(profile_from_cookies("hiretrack_user=%7Bbroken"), None);
        assert_eq!(profile_from_cookies("other=1"), None);
        assert_eq!(profile_from_cookies(""), None);
    }
}
