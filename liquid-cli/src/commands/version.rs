//! Version command
//!
//! Architecture: Functional Core, Imperative Shell (FCIS)
//!
//! - **Pure Logic**: Version string construction from build metadata
//! - **Imperative Shell**: Output printing
//! - **Testability**: Output trait injection

use crate::argument_parsing::VersionArgs;
use crate::error::CliResult;
use crate::output::Output;

// ============================================================================
// PURE LOGIC - No side effects, fully testable
// ============================================================================

/// Build metadata baked in by build.rs
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub git_branch: String,
    pub git_dirty: bool,
    pub build_timestamp: String,
    pub build_profile: String,
    pub platform: String,
}

impl VersionInfo {
    pub fn format_brief(&self) -> String {
        format!("liquid-cli {} ({} build, {})", self.version, self.build_profile, self.platform)
    }

    pub fn format_full(&self) -> String {
        let short_hash = &self.git_hash[..8.min(self.git_hash.len())];
        format!(
            "liquid-cli {}\n  Commit:   {}{} on {}\n  Built:    {} ({})\n  Platform: {}",
            self.version,
            short_hash,
            if self.git_dirty { "-dirty" } else { "" },
            self.git_branch,
            self.build_timestamp,
            self.build_profile,
            self.platform
        )
    }
}

pub fn capture_version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        git_branch: env!("GIT_BRANCH").to_string(),
        git_dirty: env!("GIT_DIRTY") == "true",
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
    }
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_version_command(args: VersionArgs) -> CliResult<()> {
    let output = crate::output::ConsoleOutput;
    handle_version_command_impl(args, &output).await
}

async fn handle_version_command_impl(args: VersionArgs, output: &dyn Output) -> CliResult<()> {
    let info = capture_version_info();
    if args.full {
        output.print(&info.format_full())
    } else {
        output.print(&info.format_brief())
    }
}
