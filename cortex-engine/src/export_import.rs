//! `export` / `import` (spec section 6): camelCase JSON at the boundary,
//! idiomatic `Memory`/`Link` everywhere else.

use cortex_core::traits::MemoryStore;
use cortex_core::CortexResult;

use crate::dto::{ExportData, ExportResponse, ImportResponse, LinkDto, MemoryDto};
use crate::Engine;

impl Engine {
    pub fn export(&self, project: Option<&str>) -> CortexResult<ExportResponse> {
        let resolved = self.resolve_project(project)?;
        let (memories, links) = self.store().export(resolved.as_deref())?;
        let data = ExportData {
            memories: memories.iter().map(MemoryDto::from).collect(),
            links: links.iter().map(LinkDto::from).collect(),
        };
        Ok(ExportResponse {
            count: data.memories.len(),
            data,
        })
    }

    /// Import is transactional in the store layer (spec section 6 "Import
    /// is transactional"); any one DTO failing to parse aborts before a
    /// single row reaches the store, matching "validates then runs in a
    /// single transaction".
    pub fn import(&self, data: ExportData) -> CortexResult<ImportResponse> {
        let memories = data
            .memories
            .into_iter()
            .map(cortex_core::memory::Memory::try_from)
            .collect::<CortexResult<Vec<_>>>()?;
        let links = data
            .links
            .into_iter()
            .map(cortex_core::link::Link::try_from)
            .collect::<CortexResult<Vec<_>>>()?;

        let imported = self.store().import(memories, links)?;
        Ok(ImportResponse { imported })
    }
}
