//! `start_session` / `end_session` (spec section 6).

use cortex_core::session::Session;
use cortex_core::traits::SessionStore;
use cortex_core::{CortexError, CortexResult};

use crate::dto::EndSessionResponse;
use crate::Engine;

impl Engine {
    pub fn start_session(&self, project: Option<&str>) -> CortexResult<Session> {
        let resolved = self.resolve_project(project)?;
        self.sessions().start_session(resolved.as_deref())
    }

    /// Ending a session runs a consolidation pass scoped to the session's
    /// project and returns its result (spec section 6 `end_session ->
    /// {consolidationResult}`).
    pub fn end_session(&self, session_id: i64, summary: Option<&str>) -> CortexResult<EndSessionResponse> {
        let session = self
            .sessions()
            .end_session(session_id, summary)?
            .ok_or(CortexError::NotFound(session_id))?;

        let consolidation_result = self.consolidate(session.project.as_deref(), false)?;
        Ok(EndSessionResponse { consolidation_result })
    }
}
