//! Prompt rendering and answer generation

pub mod chain;
pub mod prompt;

pub use chain::RagChain;
pub use prompt::PromptComposer;
