// auth.rs
//
// Login, sessions and passwords live in front of us (a reverse proxy or the site's
// login pages). All we get is a yes/no and a user name.

use axum::http::HeaderMap;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: String,
    /// The shared guest account gets no profile links.
    pub guest: bool,
}

pub trait AuthGate: Send + Sync {
    fn authorize(&self, headers: &HeaderMap) -> Option<User>;
}

/// Trusts a user name header set by the authenticating proxy.
#[derive(Clone, Debug)]
pub struct ProxyHeaderGate {
    pub header: String,
    pub guest_user: String,
}

impl AuthGate for ProxyHeaderGate {
    fn authorize(&self, headers: &HeaderMap) -> Option<User> {
        let name = headers
            .get(self.header.as_str())?
            .to_str()
            .ok()?
            .trim();
        if name.is_empty() {
            return None;
        }
        Some(User {
            name: name.to_string(),
            guest: name == self.guest_user,
        })
    }
}

/// Lets everybody in as the same user. Local testing only.
#[derive(Clone, Debug)]
pub struct TrustAllGate {
    pub user: User,
}

impl AuthGate for TrustAllGate {
    fn authorize(&self, _headers: &HeaderMap) -> Option<User> {
        Some(self.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn gate() -> ProxyHeaderGate {
        ProxyHeaderGate {
            header: "x-remote-user".into(),
            guest_user: "guest".into(),
        }
    }

    #[test]
    fn header_user() {
        let mut h = HeaderMap::new();
        h.insert("x-remote-user", HeaderValue::from_static("kyle"));
        assert_eq!(
            gate().authorize(&h),
            Some(User {
                name: "kyle".into(),
                guest: false
            })
        );

        h.insert("x-remote-user", HeaderValue::from_static("guest"));
        assert!(gate().authorize(&h).unwrap().guest);
    }

    #[test]
    fn missing_or_blank_header() {
        let mut h = HeaderMap::new();
        assert_eq!(gate().authorize(&h), None);
        h.insert("x-remote-user", HeaderValue::from_static("  "));
        assert_eq!(gate().authorize(&h), None);
    }
}

// EOF
