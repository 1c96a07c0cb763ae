pub mod enhance;
pub mod fallback;
pub mod normalize;
pub mod prompt;
pub mod tone;

pub use enhance::enhance;
pub use fallback::compose_fallback;
pub use normalize::normalize;
pub use prompt::{PromptStyle, build_prompt, clean_conversation_output, clean_instruction_output};
