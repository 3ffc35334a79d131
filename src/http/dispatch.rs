//! Maps a parsed request (or a parse failure) to a response.
//!
//! Classification order, first match wins:
//!
//! 1. stream failure → 500, close
//! 2. protocol error → 400, close
//! 3. method other than GET/HEAD → 501
//! 4. rejected path → 404
//! 5. file on disk → 200, file in startup index → 200, redirect → 302
//! 6. otherwise → 404

use crate::http::error::ParseError;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::site::{Resolution, Site, guard};

/// Answers a well-formed request.
pub async fn respond(site: &Site, request: &Request) -> Response {
    if !request.method.is_supported() {
        return Response::not_implemented();
    }

    if let Err(reason) = guard::check(&request.path) {
        tracing::debug!(path = %request.path, %reason, "Path rejected");
        return Response::not_found();
    }

    let head_only = !request.wants_body();

    match site.resolve(&request.path).await {
        Resolution::File(file) => Response::File {
            file: Some(file),
            head_only,
        },
        Resolution::Indexed => Response::File {
            file: None,
            head_only,
        },
        Resolution::Redirect(target) => {
            tracing::debug!(path = %request.path, host = ?target.url().host_str(), "Redirecting");
            Response::Redirect(target.location().to_string())
        }
        Resolution::NotFound => Response::not_found(),
    }
}

/// Answers a request that could not be parsed. Always closes.
pub fn reject(error: &ParseError) -> Response {
    Response::closing(error.status())
}

/// Whether the connection may carry another request after `response`.
pub fn keep_alive(request: &Request, response: &Response) -> bool {
    !request.close && !response.status().is_fatal()
}
