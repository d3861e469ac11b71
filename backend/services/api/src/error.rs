use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use insights_common::error::InsightsError;

pub struct ApiError(pub InsightsError);

impl From<InsightsError> for ApiError {
    fn from(err: InsightsError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            InsightsError::HandlerNotFound(_)
            | InsightsError::PostProcessNotFound(_)
            | InsightsError::TemplateNotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            InsightsError::NoData => (StatusCode::NOT_FOUND, self.0.to_string()),
            InsightsError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            InsightsError::Datastore(_)
            | InsightsError::Directory(_)
            | InsightsError::TopologyUnavailable => (StatusCode::BAD_GATEWAY, self.0.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.code(), "request failed");
        }

        let body = serde_json::json!({ "error": message, "code": self.0.code() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: InsightsError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn lookup_failures_are_not_found() {
        assert_eq!(status_of(InsightsError::HandlerNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(InsightsError::PostProcessNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(InsightsError::NoData), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        assert_eq!(status_of(InsightsError::Datastore("down".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(InsightsError::Directory("down".into())), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn bind_errors_hide_details() {
        let err = InsightsError::TemplateBind {
            template: "builds".into(),
            missing_key: "orgId".into(),
        };
        let (status, message) = ApiError(err).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal server error");
    }

    #[test]
    fn invalid_argument_is_bad_request() {
        let (status, message) =
            ApiError(InsightsError::InvalidArgument("orgId is required".into())).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "orgId is required");
    }
}
