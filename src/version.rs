//! Build identification reported to clients.
//!
//! Git metadata is injected by `build.rs` through vergen. Builds outside a
//! git checkout fall back to `unknown`.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

const GIT_DIRTY: Option<&str> = option_env!("VERGEN_GIT_DIRTY");

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    GIT_DIRTY == Some("true")
}

/// The `library_version` string served by every model info route,
/// e.g. `0.1.0+main.abc1234` or `0.1.0+main.abc1234.dirty`.
pub fn version_string() -> String {
    format_version(PKG_VERSION, GIT_BRANCH, GIT_SHA, git_dirty())
}

fn format_version(version: &str, branch: &str, sha: &str, dirty: bool) -> String {
    let short_sha = sha.get(..7).unwrap_or(sha);
    let suffix = if dirty { ".dirty" } else { "" };
    format!("{version}+{branch}.{short_sha}{suffix}")
}
