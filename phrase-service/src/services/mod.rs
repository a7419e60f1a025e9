pub mod prompts;
pub mod providers;

pub use providers::{ProviderError, TextProvider};
