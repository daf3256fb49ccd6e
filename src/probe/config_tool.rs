//! Config-tool resolution.
//!
//! Searches the executable path for the versioned config tool first, then
//! the unversioned variant. On platforms where the tool is expected
//! (non-Windows) its absence is fatal at init; elsewhere it just routes
//! flag synthesis into the introspection strategy.

use crate::probe::errors::ProbeError;
use crate::probe::platform::Platform;
use crate::util::process::find_executable;

/// The versioned config tool, searched first.
pub const VERSIONED_TOOL: &str = "python3-config";

/// The unversioned fallback.
pub const UNVERSIONED_TOOL: &str = "python-config";

/// Outcome of config-tool resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigToolProbe {
    tool: Option<String>,
    expected: bool,
}

impl ConfigToolProbe {
    /// Resolve against the real search path.
    pub fn resolve(platform: Platform) -> Self {
        Self::resolve_with(platform, |name| find_executable(name).is_some())
    }

    /// Resolve with an injected lookup.
    pub fn resolve_with(platform: Platform, lookup: impl Fn(&str) -> bool) -> Self {
        let tool = [VERSIONED_TOOL, UNVERSIONED_TOOL]
            .iter()
            .find(|name| lookup(name))
            .map(|name| name.to_string());

        if let Some(ref tool) = tool {
            tracing::debug!("resolved python config tool: {}", tool);
        }

        ConfigToolProbe {
            tool,
            expected: platform.config_tool_expected(),
        }
    }

    /// The resolved tool name, if any variant was found.
    pub fn tool(&self) -> Option<&str> {
        self.tool.as_deref()
    }

    /// Whether any variant was found.
    pub fn found(&self) -> bool {
        self.tool.is_some()
    }

    /// Whether the platform expects the tool to exist.
    pub fn expected(&self) -> bool {
        self.expected
    }

    /// Fail when the tool is required but absent. Surfaced during init so
    /// later phases never run without it.
    pub fn require(&self) -> Result<(), ProbeError> {
        if self.expected && !self.found() {
            return Err(ProbeError::ConfigToolMissing {
                versioned: VERSIONED_TOOL.to_string(),
                unversioned: UNVERSIONED_TOOL.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_preferred() {
        let probe = ConfigToolProbe::resolve_with(Platform::Linux, |_| true);
        assert_eq!(probe.tool(), Some("python3-config"));
    }

    #[test]
    fn test_unversioned_fallback() {
        let probe = ConfigToolProbe::resolve_with(Platform::Linux, |name| name == "python-config");
        assert_eq!(probe.tool(), Some("python-config"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let lookup = |name: &str| name == "python3-config";
        let first = ConfigToolProbe::resolve_with(Platform::Linux, lookup);
        let second = ConfigToolProbe::resolve_with(Platform::Linux, lookup);
        assert_eq!(first, second);
        assert_eq!(first.found(), second.found());
    }

    #[test]
    fn test_missing_where_expected_is_fatal() {
        let probe = ConfigToolProbe::resolve_with(Platform::Linux, |_| false);
        let err = probe.require().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_on_windows_is_not_fatal() {
        let probe = ConfigToolProbe::resolve_with(Platform::Windows, |_| false);
        assert!(!probe.found());
        assert!(probe.require().is_ok());
    }
}
