//! LLM prompt construction

pub mod prompt_builder;

pub use prompt_builder::{build_intro_prompt, build_outcome_prompt, result_word, OutcomeContext};
