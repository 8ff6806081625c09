// Job recommendation: ranking of classifier scores, the end-to-end pipeline and
// its HTTP handler. Course lookups go through `courses`, never the LLM client directly.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod ranker;
