//! Interpreter self-introspection.
//!
//! Instead of a separate config tool, ask the interpreter itself for its
//! build configuration: one short program prints the include path,
//! compiler flags, library directory, shared-library file name, and
//! installation prefix, one per line.

use std::path::Path;

use crate::flags::shared_lib_short_name;
use crate::probe::errors::ProbeError;
use crate::probe::interpreter::Interpreter;
use crate::probe::platform::Platform;
use crate::util::process::CommandRunner;

/// The introspection program. Missing config vars print as empty lines so
/// the output shape stays fixed.
const SYSCONFIG_SNIPPET: &str = "import sysconfig\n\
     print(sysconfig.get_path('include') or '')\n\
     print(sysconfig.get_config_var('CFLAGS') or '')\n\
     print(sysconfig.get_config_var('LIBDIR') or '')\n\
     print(sysconfig.get_config_var('LDLIBRARY') or '')\n\
     print(sysconfig.get_config_var('prefix') or '')";

/// What the interpreter reported about its own build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysconfigReport {
    /// C header include path.
    pub include: Option<String>,
    /// Compiler flags used to build the interpreter.
    pub cflags: Option<String>,
    /// Directory holding the runtime library.
    pub libdir: Option<String>,
    /// Shared-library file name (e.g. `libpython3.11.so`).
    pub ldlibrary: Option<String>,
    /// Installation prefix.
    pub prefix: Option<String>,
}

impl SysconfigReport {
    /// Run the introspection program and parse its output.
    pub fn query(
        interpreter: &Interpreter,
        runner: &dyn CommandRunner,
        cwd: Option<&Path>,
    ) -> Result<Self, ProbeError> {
        let out = interpreter.run_snippet(runner, cwd, SYSCONFIG_SNIPPET)?;
        Ok(Self::parse(&out))
    }

    /// Parse the five report lines; empty lines become `None`.
    pub fn parse(stdout: &str) -> Self {
        let mut lines = stdout.lines().map(|l| {
            let l = l.trim_end_matches('\r').trim();
            if l.is_empty() {
                None
            } else {
                Some(l.to_string())
            }
        });

        SysconfigReport {
            include: lines.next().flatten(),
            cflags: lines.next().flatten(),
            libdir: lines.next().flatten(),
            ldlibrary: lines.next().flatten(),
            prefix: lines.next().flatten(),
        }
    }

    /// The runtime library reduced to a linker short name: platform
    /// prefix and suffix stripped from the reported file name.
    pub fn lib_short_name(&self, platform: Platform) -> Option<String> {
        let file = self.ldlibrary.as_deref()?;
        shared_lib_short_name(
            file,
            platform.shared_lib_prefix(),
            platform.shared_lib_suffixes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_report() {
        let report = SysconfigReport::parse(
            "/usr/include/python3.11\n\
             -Wno-unused-result -Wsign-compare\n\
             /usr/lib\n\
             libpython3.11.so\n\
             /usr\n",
        );
        assert_eq!(report.include.as_deref(), Some("/usr/include/python3.11"));
        assert_eq!(
            report.cflags.as_deref(),
            Some("-Wno-unused-result -Wsign-compare")
        );
        assert_eq!(report.libdir.as_deref(), Some("/usr/lib"));
        assert_eq!(report.ldlibrary.as_deref(), Some("libpython3.11.so"));
        assert_eq!(report.prefix.as_deref(), Some("/usr"));
    }

    #[test]
    fn test_parse_missing_vars() {
        let report = SysconfigReport::parse("/inc\n\n\n\n\n");
        assert_eq!(report.include.as_deref(), Some("/inc"));
        assert_eq!(report.cflags, None);
        assert_eq!(report.libdir, None);
        assert_eq!(report.ldlibrary, None);
        assert_eq!(report.prefix, None);
    }

    #[test]
    fn test_parse_crlf_output() {
        let report = SysconfigReport::parse("C:\\py\\include\r\n\r\n\r\npython311.dll\r\nC:\\py\r\n");
        assert_eq!(report.include.as_deref(), Some("C:\\py\\include"));
        assert_eq!(report.ldlibrary.as_deref(), Some("python311.dll"));
    }

    #[test]
    fn test_embed_short_name_from_shared_lib() {
        let report = SysconfigReport {
            ldlibrary: Some("libpython3.11.so".to_string()),
            ..SysconfigReport::default()
        };
        assert_eq!(
            report.lib_short_name(Platform::Linux),
            Some("python3.11".to_string())
        );

        let report = SysconfigReport {
            ldlibrary: Some("python311.dll".to_string()),
            ..SysconfigReport::default()
        };
        assert_eq!(
            report.lib_short_name(Platform::Windows),
            Some("python311".to_string())
        );
    }
}
