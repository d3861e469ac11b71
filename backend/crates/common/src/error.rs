use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(String),

    #[error("post-process not found: {0}")]
    PostProcessNotFound(String),

    #[error("handler registered twice: {0}")]
    DuplicateHandler(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template {template} is missing a value for @{missing_key}")]
    TemplateBind {
        template: String,
        missing_key: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("datastore error: {0}")]
    Datastore(String),

    #[error("topology cache unavailable")]
    TopologyUnavailable,

    #[error("organization directory error: {0}")]
    Directory(String),

    #[error("transform error: {0}")]
    Transform(String),

    #[error("no data found")]
    NoData,

    #[error("internal error: {0}")]
    Internal(String),
}

impl InsightsError {
    /// Stable machine-readable code surfaced to the UI.
    pub fn code(&self) -> &'static str {
        match self {
            InsightsError::Config(_) => "CONFIG",
            InsightsError::HandlerNotFound(_) => "HANDLER_NOT_FOUND",
            InsightsError::PostProcessNotFound(_) => "POST_PROCESS_NOT_FOUND",
            InsightsError::DuplicateHandler(_) => "DUPLICATE_HANDLER",
            InsightsError::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            InsightsError::TemplateBind { .. } => "INTERNAL",
            InsightsError::InvalidArgument(_) => "INVALID_ARGUMENT",
            InsightsError::Datastore(_) => "DATASTORE",
            InsightsError::TopologyUnavailable => "TOPOLOGY_UNAVAILABLE",
            InsightsError::Directory(_) => "DIRECTORY",
            InsightsError::Transform(_) => "TRANSFORM",
            InsightsError::NoData => "NO_DATA",
            InsightsError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<serde_json::Error> for InsightsError {
    fn from(err: serde_json::Error) -> Self {
        InsightsError::Transform(err.to_string())
    }
}

pub type InsightsResult<T> = Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_template_and_key() {
        let err = InsightsError::TemplateBind {
            template: "commitTrends".to_string(),
            missing_key: "orgId".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "template commitTrends is missing a value for @orgId"
        );
        assert_eq!(err.code(), "INTERNAL");
    }

    #[test]
    fn unmarshal_failure_is_a_transform_error() {
        let err: InsightsError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, InsightsError::Transform(_)));
    }
}
