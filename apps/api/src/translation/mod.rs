// Résumé translation engine.
// Implements: placeholder protection, prompt building, model fallback, response
// sanitizing, date localization, section-label reconciliation and retries.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod content;
pub mod dates;
pub mod document;
pub mod errors;
pub mod handlers;
pub mod invoker;
pub mod language;
pub mod pipeline;
pub mod placeholders;
pub mod prompts;
pub mod retry;
pub mod sanitizer;
pub mod sections;

#[cfg(test)]
pub mod testing;
