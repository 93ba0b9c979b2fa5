//! Request-scoped upload confirmation.
//!
//! The gallery shows the upload toast when the visitor arrives from the
//! submit page or from a post-upload redirect carrying `uploaded=1`.

use axum::extract::{FromRequestParts, Query};
use axum::http::{header, request::Parts};
use serde::Deserialize;
use std::convert::Infallible;

#[derive(Debug, Deserialize)]
struct ToastQuery {
    uploaded: Option<String>,
}

/// Whether this request should show the upload toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadToast(pub bool);

impl UploadToast {
    pub fn from_parts(parts: &Parts) -> Self {
        let from_submit = parts
            .headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|referer| referer.contains("submit"));

        let redirected = Query::<ToastQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.uploaded)
            .is_some_and(|v| v == "1");

        UploadToast(from_submit || redirected)
    }
}

impl<S> FromRequestParts<S> for UploadToast
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, referer: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(r) = referer {
            builder = builder.header(header::REFERER, r);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_referer_from_submit_shows_toast() {
        assert!(UploadToast::from_parts(&parts("/", Some("http://host/submit"))).0);
        assert!(!UploadToast::from_parts(&parts("/", Some("http://host/approve"))).0);
    }

    #[test]
    fn test_uploaded_query_shows_toast() {
        assert!(UploadToast::from_parts(&parts("/?uploaded=1", None)).0);
        assert!(!UploadToast::from_parts(&parts("/?uploaded=0", None)).0);
        assert!(!UploadToast::from_parts(&parts("/", None)).0);
    }
}
