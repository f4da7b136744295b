//! Security headers middleware.
//!
//! Adds clickjacking, MIME-sniffing and referrer protections plus a CSP that
//! allows the Bootstrap stylesheet from jsDelivr and the page's own nonce-tagged
//! inline style and script.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Origin of the Bootstrap stylesheet.
const STYLE_CDN: &str = "https://cdn.jsdelivr.net";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: same-origin`
/// - `Cache-Control: no-store` (pages embed per-session greeting and flashes)
/// - `Content-Security-Policy` built by [`content_security_policy`]
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    match HeaderValue::from_str(&content_security_policy(nonce.as_ref())) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid CSP header value"),
    }

    response
}

/// Build the CSP. Without a nonce no inline code is allowed at all.
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let inline = nonce
        .map(|n| format!(" 'nonce-{}'", n.value()))
        .unwrap_or_default();

    format!(
        "default-src 'self'; \
         script-src 'self'{inline}; \
         style-src 'self' {STYLE_CDN}{inline}; \
         img-src 'self' data:; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_includes_nonce_for_scripts_and_styles() {
        let nonce = CspNonce("abc123".to_string());
        let policy = content_security_policy(Some(&nonce));
        assert!(policy.contains("script-src 'self' 'nonce-abc123';"));
        assert!(policy.contains("style-src 'self' https://cdn.jsdelivr.net 'nonce-abc123';"));
    }

    #[test]
    fn test_policy_without_nonce_blocks_inline() {
        let policy = content_security_policy(None);
        assert!(!policy.contains("nonce-"));
        assert!(policy.contains("frame-ancestors 'none'"));
    }
}
