//! `get_context` (spec section 6 / 4.8).

use cortex_core::CortexResult;
use cortex_session::{format_context_summary, generate_context_summary, ContextFormat};

use crate::dto::{ContextResponse, ContextSummaryDto};
use crate::recall::RecallRequest;
use crate::Engine;

/// Parse the `format` input field (`summary`/`detailed`/`raw`, spec
/// section 6); unrecognized values fall back to `summary`.
pub fn parse_format(s: &str) -> ContextFormat {
    match s {
        "detailed" => ContextFormat::Detailed,
        "raw" => ContextFormat::Raw,
        _ => ContextFormat::Summary,
    }
}

impl Engine {
    pub fn get_context(
        &self,
        project: Option<&str>,
        query: Option<&str>,
        format: ContextFormat,
    ) -> CortexResult<ContextResponse> {
        let resolved = self.resolve_project(project)?;
        let summary = generate_context_summary(self.store().as_ref(), resolved.as_deref())?;
        let context = format_context_summary(&summary, format);

        let relevant_memories = match query {
            Some(q) if !q.trim().is_empty() => {
                let request = RecallRequest {
                    query: Some(q.to_string()),
                    project: resolved.clone(),
                    limit: Some(self.config().default_recall_limit),
                    ..Default::default()
                };
                self.recall(request)?.memories
            }
            _ => Vec::new(),
        };

        Ok(ContextResponse {
            context,
            summary: ContextSummaryDto::from(&summary),
            relevant_memories,
        })
    }
}
