pub mod extractor;
pub mod prompts;
pub mod provider;
pub mod providers;

pub use extractor::{ExtractionError, JobExtractor};
pub use provider::{LlmError, LlmProvider, Message, ResponseSchema, Role};
pub use providers::OpenRouterProvider;
