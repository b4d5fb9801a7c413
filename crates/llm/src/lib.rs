pub mod analysis;
pub mod normalize;
pub mod provider;
pub mod providers;

pub use analysis::{AnalysisService, AnalysisSettings, MAX_CONTENT_CHARS};
pub use normalize::{decode, normalize, Decoded};
pub use provider::{CompletionRequest, LlmError, LlmProvider, Message, Role};
pub use providers::openai::OpenAiCompatibleProvider;
