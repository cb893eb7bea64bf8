//! Minimal Landlock sandbox setup for Linux.
//!
//! Best-effort hardening: if Landlock is unavailable or setup fails (older kernel, missing
//! permissions) we log and continue without sandboxing rather than refusing to start.

#[cfg(target_os = "linux")]
pub mod linux {
    use landlock::{
        path_beneath_rules, Access, AccessFs, Ruleset, RulesetAttr, RulesetCreatedAttr,
        RulesetStatus, ABI,
    };
    use std::path::Path;
    use tracing::{info, warn};

    /// System paths the process still reads after sandboxing (resolver config, CA bundles,
    /// NSS modules).
    const SYSTEM_READ_PATHS: &[&str] = &["/etc", "/usr", "/lib", "/lib64"];

    /// Restrict the calling thread, and every thread it spawns afterwards, to read-only
    /// access beneath the reports directory and the system read paths.
    pub fn init(reports_directory: &str) {
        let abi = ABI::V1;
        let access_all = AccessFs::from_all(abi);
        let access_read = AccessFs::from_read(abi);

        let mut read_paths = vec![reports_directory];
        read_paths.extend(
            SYSTEM_READ_PATHS
                .iter()
                .copied()
                .filter(|path| Path::new(path).exists()),
        );

        let result = Ruleset::default()
            .handle_access(access_all)
            .and_then(|r| r.create())
            .and_then(|r| r.add_rules(path_beneath_rules(&read_paths, access_read)))
            .and_then(|r| r.restrict_self());

        match result {
            Ok(status) => match status.ruleset {
                RulesetStatus::FullyEnforced => info!(
                    ?status,
                    reports_directory,
                    "Landlock sandbox fully enforced (read-only filesystem access)"
                ),
                RulesetStatus::PartiallyEnforced => info!(
                    ?status,
                    reports_directory,
                    "Landlock sandbox partially enforced (read-only filesystem access)"
                ),
                RulesetStatus::NotEnforced => warn!(
                    ?status,
                    "Landlock ruleset not enforced; kernel does not support requested features"
                ),
            },
            Err(err) => {
                warn!(?err, "Landlock not enabled; continuing without sandbox");
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub mod linux {
    /// No-op on non-Linux targets.
    pub fn init(_reports_directory: &str) {}
}
