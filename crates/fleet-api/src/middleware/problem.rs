//! Stamps the request path into problem documents.

use axum::Json;
use axum::extract::Request;
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ProblemDetails;

/// Fill `instance` on any [`ProblemDetails`] produced further down the stack.
///
/// Status and headers of the original response are kept.
pub async fn problem_instance(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    let Some(problem) = response.extensions().get::<ProblemDetails>() else {
        return response;
    };
    if problem.instance.is_some() {
        return response;
    }
    let problem = ProblemDetails {
        instance: Some(path),
        ..problem.clone()
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let (_, body) = Json(&problem).into_response().into_parts();
    parts.extensions.insert(problem);
    Response::from_parts(parts, body)
}
