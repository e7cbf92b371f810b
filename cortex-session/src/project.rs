//! C10: derive the "project" scoping tag (spec §4.10).

use std::path::Path;
use std::sync::Mutex;

const SKIP_SET: &[&str] = &[
    "src", "lib", "dist", "build", "out", "node_modules", ".git", ".next", ".cache", "test",
    "tests", "__tests__", "spec", "bin", "scripts", "config", "public", "static",
];

const ENV_VAR: &str = "CLAUDE_MEMORY_PROJECT";

/// Walk `cwd`'s path segments right-to-left, returning the first that is
/// neither hidden (`.`-prefixed) nor in the skip set. `None` if none qualify.
pub fn detect_from_cwd(cwd: &Path) -> Option<String> {
    cwd.components()
        .filter_map(|c| c.as_os_str().to_str())
        .rev()
        .find(|seg| !seg.is_empty() && !seg.starts_with('.') && !SKIP_SET.contains(seg))
        .map(str::to_string)
}

/// Read `CLAUDE_MEMORY_PROJECT`. `*` maps to "global" (`Some(None)`); any
/// other non-empty value maps to `Some(Some(value))`; unset/empty yields
/// `None`, meaning "fall through to CWD detection".
fn detect_from_env() -> Option<Option<String>> {
    match std::env::var(ENV_VAR) {
        Ok(v) if v == "*" => Some(None),
        Ok(v) if !v.trim().is_empty() => Some(Some(v)),
        _ => None,
    }
}

fn detect_auto(cwd: &Path) -> Option<String> {
    match detect_from_env() {
        Some(from_env) => from_env,
        None => detect_from_cwd(cwd),
    }
}

/// `resolve(explicit)`: `*` means global (`None`); an explicit non-`*`
/// value wins outright (trimmed); otherwise fall back to the cached
/// auto-detected value (env var, then CWD walk).
pub fn resolve(explicit: Option<&str>, cwd: &Path) -> Option<String> {
    match explicit {
        Some("*") => None,
        Some(value) => Some(value.trim().to_string()),
        None => detect_auto(cwd),
    }
}

/// Process-wide cache of the auto-detected project (spec §5/§9 "the
/// active-project cache... set once at startup, mutable via
/// `setActiveProject`" — the only module-level mutable state besides the
/// embedder singleton).
pub struct ProjectResolver {
    cached: Mutex<Option<Option<String>>>,
}

impl Default for ProjectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectResolver {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    pub fn resolve(&self, explicit: Option<&str>, cwd: &Path) -> Option<String> {
        match explicit {
            Some("*") => None,
            Some(value) => Some(value.trim().to_string()),
            None => {
                let mut guard = self.cached.lock().unwrap();
                if guard.is_none() {
                    *guard = Some(detect_auto(cwd));
                }
                guard.clone().flatten()
            }
        }
    }

    /// `setActiveProject`: overwrite the cached auto-detected value.
    pub fn set_active_project(&self, project: Option<String>) {
        *self.cached.lock().unwrap() = Some(project);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn wildcard_explicit_is_global() {
        assert_eq!(resolve(Some("*"), &PathBuf::from("/x")), None);
    }

    #[test]
    fn explicit_value_wins() {
        assert_eq!(
            resolve(Some(" proj-foo "), &PathBuf::from("/x")),
            Some("proj-foo".to_string())
        );
    }

    #[test]
    fn cwd_walk_skips_conventional_dirs() {
        let cwd = PathBuf::from("/u/alice/proj-foo/src/lib");
        assert_eq!(detect_from_cwd(&cwd), Some("proj-foo".to_string()));
    }

    #[test]
    fn cwd_walk_returns_none_when_all_segments_skipped() {
        let cwd = PathBuf::from("/src/lib/test");
        assert_eq!(detect_from_cwd(&cwd), None);
    }

    #[test]
    fn cwd_walk_skips_hidden_segments() {
        let cwd = PathBuf::from("/u/alice/.cache/proj-bar");
        assert_eq!(detect_from_cwd(&cwd), Some("proj-bar".to_string()));
    }
}
