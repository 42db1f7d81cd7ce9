pub mod env;
mod gemini;
#[cfg(feature = "groq")]
mod groq;
mod prompt_builder;
mod provider;
mod provider_set;
mod response_parsing;

pub use env::ProviderConfig;
pub use gemini::GeminiProvider;
#[cfg(feature = "groq")]
pub use groq::{GROQ_TEMPERATURE, GroqProvider};
pub use prompt_builder::{ExplainPrompt, PromptBuilder, TUTOR_PREAMBLE, USER_LEAD_IN};
pub use provider::{CompletionRequest, TextCompletionProvider};
pub use provider_set::ProviderSet;
