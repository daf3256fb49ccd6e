//! Flag-token algebra.
//!
//! Pure string/token surgery on compiler and linker flag text. Nothing in
//! this module touches the filesystem or spawns a process, so every
//! transformation is unit-testable in isolation.

use std::path::{Path, PathBuf};

/// The include-flag prefix stripped from config-tool output tokens.
pub const INCLUDE_PREFIX: &str = "-I";

/// The library-path flag prefix.
pub const LIB_DIR_PREFIX: &str = "-L";

/// The library-name flag prefix.
pub const LIB_PREFIX: &str = "-l";

/// Collapse repeated interior spaces to single spaces.
///
/// Leading and trailing whitespace is left alone; only runs inside the
/// string are deduplicated.
pub fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c == ' ' {
            if !last_was_space {
                out.push(c);
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Remove each listed substring (exact textual match) from `s`,
/// collapsing repeated spaces before and after.
pub fn delete_substrings(s: &str, deletes: &[String]) -> String {
    let mut out = collapse_spaces(s);
    for needle in deletes {
        if needle.is_empty() {
            continue;
        }
        out = out.replace(needle.as_str(), "");
    }
    collapse_spaces(&out)
}

/// Strip the include-flag prefix from a token exactly once, if present.
pub fn strip_include_prefix(token: &str) -> &str {
    token.strip_prefix(INCLUDE_PREFIX).unwrap_or(token)
}

/// Parse config-tool `--includes` output into bare directory paths.
///
/// The output is a whitespace-delimited token sequence; each token that
/// carries the include prefix has it stripped once.
pub fn parse_include_flags(s: &str) -> Vec<PathBuf> {
    s.split_whitespace()
        .map(strip_include_prefix)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Trim exactly one trailing newline from captured probe output, plus one
/// trailing carriage return when `windows` is set.
pub fn trim_probe_line(s: &str, windows: bool) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    if windows {
        s.strip_suffix('\r').unwrap_or(s)
    } else {
        s
    }
}

/// Whether a `-l` token names the Python runtime itself (as opposed to a
/// system library like `pthread` that must stay in the raw link text).
pub fn is_python_runtime_lib(name: &str) -> bool {
    name.starts_with("python")
}

/// Structured entries lifted out of a raw linker-flag string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkParts {
    /// A `-L` entry matching the known installation library directory.
    pub lib_dir: Option<PathBuf>,
    /// Runtime library names lifted from `-l` tokens (embed mode only).
    pub libs: Vec<String>,
    /// Whatever remains, whitespace-normalized.
    pub rest: String,
}

/// Partition a (already substring-filtered) linker-flag string into
/// structured entries and remaining raw text.
///
/// When `lib_dir` is known, a `-L<lib_dir>` token is lifted out so the
/// caller can register the directory as a typed library path. In embed
/// mode, `-l` tokens naming the Python runtime are lifted out as library
/// names; everything else stays in `rest` in its original order.
pub fn partition_link_flags(raw: &str, lib_dir: Option<&Path>, embed: bool) -> LinkParts {
    let lib_dir_token = lib_dir.map(|d| format!("{}{}", LIB_DIR_PREFIX, d.display()));

    let mut parts = LinkParts::default();
    let mut rest = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(ref wanted) = lib_dir_token {
            if token == wanted && parts.lib_dir.is_none() {
                parts.lib_dir = lib_dir.map(Path::to_path_buf);
                continue;
            }
        }
        if embed {
            if let Some(name) = token.strip_prefix(LIB_PREFIX) {
                if is_python_runtime_lib(name) {
                    parts.libs.push(name.to_string());
                    continue;
                }
            }
        }
        rest.push(token);
    }

    parts.rest = rest.join(" ");
    parts
}

/// Reduce a shared-library file name to a linker short name by stripping
/// the platform prefix once and truncating at the first matching suffix.
///
/// `libpython3.11.so` with prefix `lib` and suffix `.so` yields
/// `python3.11`; versioned names like `libpython3.so.1.0` are handled by
/// cutting at the suffix rather than requiring it to terminate the name.
pub fn shared_lib_short_name(file_name: &str, prefix: &str, suffixes: &[&str]) -> Option<String> {
    let stem = if !prefix.is_empty() {
        file_name.strip_prefix(prefix).unwrap_or(file_name)
    } else {
        file_name
    };

    for suffix in suffixes {
        if let Some(pos) = stem.rfind(suffix) {
            let name = &stem[..pos];
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_spaces_interior_only() {
        assert_eq!(collapse_spaces("a   b  c"), "a b c");
        assert_eq!(collapse_spaces(" a b "), " a b ");
        assert_eq!(collapse_spaces(""), "");
    }

    #[test]
    fn test_delete_substrings_is_pure() {
        let raw = "-lpython3.11  -Wl,-O1   -lpthread";
        let deletes = vec!["-Wl,-O1".to_string()];
        let once = delete_substrings(raw, &deletes);
        let twice = delete_substrings(raw, &deletes);
        assert_eq!(once, twice);
        assert!(!once.contains("-Wl,-O1"));
        assert!(!once.contains("  "));
    }

    #[test]
    fn test_delete_empty_list_collapses_only() {
        assert_eq!(delete_substrings("-la  -lb", &[]), "-la -lb");
    }

    #[test]
    fn test_include_prefix_stripped_exactly_once() {
        assert_eq!(
            strip_include_prefix("-I/usr/include/python3.11"),
            "/usr/include/python3.11"
        );
        // A pathological path starting with -I after the flag keeps it.
        assert_eq!(strip_include_prefix("-I-Iweird"), "-Iweird");
        assert_eq!(strip_include_prefix("/plain/path"), "/plain/path");
    }

    #[test]
    fn test_parse_include_flags() {
        let dirs = parse_include_flags(
            "-I/usr/include/python3.11 -I/usr/include/python3.11 /extra/dir\n",
        );
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/usr/include/python3.11"),
                PathBuf::from("/usr/include/python3.11"),
                PathBuf::from("/extra/dir"),
            ]
        );
    }

    #[test]
    fn test_trim_probe_line() {
        assert_eq!(trim_probe_line("/opt/py/include\n", false), "/opt/py/include");
        assert_eq!(trim_probe_line("/opt/py/include\r\n", true), "/opt/py/include");
        // Exactly one newline is trimmed.
        assert_eq!(trim_probe_line("x\n\n", false), "x\n");
        assert_eq!(trim_probe_line("x", false), "x");
    }

    #[test]
    fn test_partition_embed_scenario() {
        // Raw string "-L/usr/lib -lpython3.11 -lpthread ", prefix /usr,
        // embed on: lib path /usr/lib, lib name python3.11, and only
        // -lpthread remains.
        let parts = partition_link_flags(
            "-L/usr/lib -lpython3.11 -lpthread ",
            Some(Path::new("/usr/lib")),
            true,
        );
        assert_eq!(parts.lib_dir, Some(PathBuf::from("/usr/lib")));
        assert_eq!(parts.libs, vec!["python3.11".to_string()]);
        assert_eq!(parts.rest, "-lpthread");
    }

    #[test]
    fn test_partition_without_embed_keeps_libs() {
        let parts = partition_link_flags(
            "-L/usr/lib -lpython3.11 -lpthread",
            Some(Path::new("/usr/lib")),
            false,
        );
        assert_eq!(parts.lib_dir, Some(PathBuf::from("/usr/lib")));
        assert!(parts.libs.is_empty());
        assert_eq!(parts.rest, "-lpython3.11 -lpthread");
    }

    #[test]
    fn test_partition_unknown_lib_dir_left_in_rest() {
        let parts = partition_link_flags("-L/other/lib -lm", None, false);
        assert_eq!(parts.lib_dir, None);
        assert_eq!(parts.rest, "-L/other/lib -lm");
    }

    #[test]
    fn test_shared_lib_short_name() {
        assert_eq!(
            shared_lib_short_name("libpython3.11.so", "lib", &[".so"]),
            Some("python3.11".to_string())
        );
        assert_eq!(
            shared_lib_short_name("libpython3.so.1.0", "lib", &[".so"]),
            Some("python3".to_string())
        );
        assert_eq!(
            shared_lib_short_name("libpython3.11.dylib", "lib", &[".dylib", ".so"]),
            Some("python3.11".to_string())
        );
        assert_eq!(
            shared_lib_short_name("python311.dll", "", &[".dll", ".lib"]),
            Some("python311".to_string())
        );
        assert_eq!(shared_lib_short_name("notalib", "lib", &[".so"]), None);
    }
}
