mod errors;
mod examples;
mod explain_request;
mod provider_kind;

pub use errors::{
    ConfigError, ErrorCategory, ExplainError, InputField, ProviderError, ProviderFailureKind,
};
pub use examples::{EXAMPLE_PROBLEMS, ExampleProblem};
pub use explain_request::{ApiKey, ExplainRequest, validate_inputs};
pub use provider_kind::ProviderKind;
