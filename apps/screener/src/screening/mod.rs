// Resume screening: batch runner, three-stage pipeline, prompts, HTTP handlers.
// All completion calls go through llm_client::CompletionClient.

pub mod batch;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
