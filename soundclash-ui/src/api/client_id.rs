//! Cookie-based client identification
//!
//! Every voting request carries a `soundclash-cid` cookie holding an opaque
//! UUID. The middleware accepts a valid existing value, mints one
//! otherwise, and re-sets the cookie on the way out so the expiry keeps
//! sliding. Handlers read the id from request extensions; the stored voter
//! id carries a `cookie:` prefix to keep the namespace explicit.

use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

const COOKIE_NAME: &str = "soundclash-cid";
const COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Voter identifier extracted from the client cookie.
#[derive(Debug, Clone)]
pub struct ClientId(pub String);

pub async fn client_id_middleware(mut request: Request, next: Next) -> Response {
    let id = cookie_value(request.headers(), COOKIE_NAME)
        .and_then(|v| Uuid::parse_str(v).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    request
        .extensions_mut()
        .insert(ClientId(format!("cookie:{id}")));

    let mut response = next.run(request).await;

    let cookie =
        format!("{COOKIE_NAME}={id}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; SameSite=Lax; HttpOnly");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    response
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=1; soundclash-cid=abc; later=2"),
        );

        assert_eq!(cookie_value(&headers, COOKIE_NAME), Some("abc"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_value_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, COOKIE_NAME), None);
    }
}
