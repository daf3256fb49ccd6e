//! Build-description capability consumed from the host build tool.
//!
//! The probe engine never owns project structure; it feeds resolved
//! include directories, library paths, library names, and raw linker text
//! into whatever implements [`BuildDescription`]. `HostProject` is the
//! in-crate reference implementation used by the CLI and by tests.

use std::path::{Path, PathBuf};

/// The output artifact kind of the project being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// An executable.
    #[default]
    Exe,
    /// A shared library.
    SharedLib,
    /// A static archive. Raw link text is never injected for these.
    StaticLib,
}

impl OutputKind {
    /// Whether the output is a static archive.
    pub fn is_static_archive(&self) -> bool {
        matches!(self, OutputKind::StaticLib)
    }
}

/// The build-tool capabilities the probe engine requires from its host.
pub trait BuildDescription {
    /// The project's working directory; probes run with this as cwd.
    fn project_dir(&self) -> &Path;

    /// The current build output mode.
    fn output_kind(&self) -> OutputKind;

    /// Register an include search directory.
    fn add_include_dir(&mut self, dir: &Path);

    /// Register a library search directory.
    fn add_lib_dir(&mut self, dir: &Path);

    /// Register a library by linker short name.
    fn add_lib(&mut self, name: &str);

    /// Prepend a raw linker-flag string to the link command.
    fn prepend_ldflags(&mut self, flags: &str);

    /// Visit every reverse-dependent sub-project so it can inherit the
    /// same resolved paths.
    fn for_each_dependent(&mut self, f: &mut dyn FnMut(&mut dyn BuildDescription));
}

/// Reference [`BuildDescription`] backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct HostProject {
    /// Project working directory.
    pub dir: PathBuf,
    /// Output artifact kind.
    pub kind: OutputKind,
    /// Registered include directories, in registration order.
    pub include_dirs: Vec<PathBuf>,
    /// Registered library directories.
    pub lib_dirs: Vec<PathBuf>,
    /// Registered library short names.
    pub libs: Vec<String>,
    /// Raw linker-flag strings; prepends land at the front.
    pub ldflags: Vec<String>,
    /// Reverse-dependent sub-projects.
    pub dependents: Vec<HostProject>,
}

impl HostProject {
    /// Create a project rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        HostProject {
            dir: dir.into(),
            ..HostProject::default()
        }
    }

    /// Set the output kind.
    pub fn with_kind(mut self, kind: OutputKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add a reverse-dependent sub-project.
    pub fn with_dependent(mut self, dep: HostProject) -> Self {
        self.dependents.push(dep);
        self
    }
}

impl BuildDescription for HostProject {
    fn project_dir(&self) -> &Path {
        &self.dir
    }

    fn output_kind(&self) -> OutputKind {
        self.kind
    }

    fn add_include_dir(&mut self, dir: &Path) {
        self.include_dirs.push(dir.to_path_buf());
    }

    fn add_lib_dir(&mut self, dir: &Path) {
        self.lib_dirs.push(dir.to_path_buf());
    }

    fn add_lib(&mut self, name: &str) {
        self.libs.push(name.to_string());
    }

    fn prepend_ldflags(&mut self, flags: &str) {
        self.ldflags.insert(0, flags.to_string());
    }

    fn for_each_dependent(&mut self, f: &mut dyn FnMut(&mut dyn BuildDescription)) {
        for dep in &mut self.dependents {
            f(dep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_orders_first() {
        let mut p = HostProject::new(".");
        p.prepend_ldflags("-lfoo");
        p.prepend_ldflags("-lbar");
        assert_eq!(p.ldflags, vec!["-lbar".to_string(), "-lfoo".to_string()]);
    }

    #[test]
    fn test_dependents_visited() {
        let mut p = HostProject::new(".")
            .with_dependent(HostProject::new("a"))
            .with_dependent(HostProject::new("b"));

        p.for_each_dependent(&mut |d| d.add_include_dir(Path::new("/inc")));
        assert!(p
            .dependents
            .iter()
            .all(|d| d.include_dirs == vec![PathBuf::from("/inc")]));
    }

    #[test]
    fn test_static_archive_detection() {
        assert!(OutputKind::StaticLib.is_static_archive());
        assert!(!OutputKind::Exe.is_static_archive());
        assert!(!OutputKind::SharedLib.is_static_archive());
    }
}
