mod dispatcher;
mod explain_job_runner;

pub use dispatcher::Dispatcher;
pub use explain_job_runner::{ExplainJobRunner, ExplainJobState, ExplainJobUpdate};
