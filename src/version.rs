//! Build information embedded by `build.rs`.

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => "unknown",
};

const TARGET_TRIPLE: &str = match option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
    Some(triple) => triple,
    None => "unknown",
};

/// Snapshot of what binary is running, reported by `/health`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_branch: &'static str,
    pub git_sha: &'static str,
    pub dirty: bool,
    pub built_at: &'static str,
    pub target: &'static str,
}

impl BuildInfo {
    /// Build information for the current binary.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            git_branch: GIT_BRANCH,
            git_sha: GIT_SHA,
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
            built_at: BUILD_TIMESTAMP,
            target: TARGET_TRIPLE,
        }
    }

    /// Short SHA (at most 7 characters).
    pub fn short_sha(&self) -> &str {
        &self.git_sha[..7.min(self.git_sha.len())]
    }

    /// `{version}+{branch}.{sha}` with a `.dirty` suffix for modified trees.
    pub fn version_string(&self) -> String {
        let dirty_suffix = if self.dirty { ".dirty" } else { "" };
        format!(
            "{}+{}.{}{dirty_suffix}",
            self.version,
            self.git_branch,
            self.short_sha()
        )
    }
}
