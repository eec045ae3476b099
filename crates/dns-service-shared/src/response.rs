//! Response formatting.
//!
//! Handlers never build responses by hand: success values go through
//! [`respond`] and failures through [`respond_error`], which both record the
//! chosen status in the [`RequestContext`] for the logging middleware.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

use crate::context::RequestContext;
use crate::error::{HandlerError, WebError};

const APPLICATION_JSON: &str = "application/json";

/// Serialize `value` as the JSON body of a response with `status`.
///
/// # Errors
///
/// Returns [`HandlerError::Serialize`] if `value` cannot be encoded. The
/// status is only recorded once the response has been built.
pub fn respond<T: Serialize + ?Sized>(
    ctx: &RequestContext,
    value: &T,
    status: StatusCode,
) -> Result<Response, HandlerError> {
    let body = serde_json::to_vec(value)?;

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
        .body(Body::from(body))?;

    ctx.set_status(status);
    Ok(response)
}

/// Render `err` as an error envelope.
///
/// Classified errors keep their status and message; [`WebError::Internal`]
/// becomes a 500 with a generic message.
pub fn respond_error(ctx: &RequestContext, err: &WebError) -> Result<Response, HandlerError> {
    if let WebError::Internal(source) = err {
        tracing::error!(
            request_id = %ctx.request_id(),
            error = %source,
            "internal error while handling request"
        );
    }
    respond(ctx, &err.to_response(), err.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestId;
    use crate::error::{ErrorResponse, FieldError};
    use axum::body::to_bytes;
    use serde::ser::Error as _;

    fn ctx() -> RequestContext {
        RequestContext::new(RequestId::new("test"))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn respond_writes_json_and_records_status() {
        let ctx = ctx();
        let response = respond(&ctx, &serde_json::json!({"loc": 1.5}), StatusCode::OK).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_JSON
        );
        assert_eq!(ctx.status(), Some(StatusCode::OK));

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["loc"], 1.5);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn respond_propagates_serialization_failure() {
        let ctx = ctx();
        let err = respond(&ctx, &Unserializable, StatusCode::OK).unwrap_err();

        assert!(matches!(err, HandlerError::Serialize(_)));
        assert_eq!(ctx.status(), None);
    }

    #[tokio::test]
    async fn respond_error_renders_validation_fields() {
        let ctx = ctx();
        let err = WebError::Validation {
            fields: vec![FieldError::required("y")],
        };
        let response = respond_error(&ctx, &err).unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ctx.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));

        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.error, "validation error");
        assert_eq!(body.fields, vec![FieldError::required("y")]);
    }

    #[tokio::test]
    async fn respond_error_hides_internal_detail() {
        let ctx = ctx();
        let err = WebError::from(anyhow::anyhow!("secret detail"));
        let response = respond_error(&ctx, &err).unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body, ErrorResponse::new("Internal Server Error"));
    }
}
