//! `pyprobe flags` command

use anyhow::{Context, Result};

use crate::cli::FlagsArgs;
use pyprobe::{HostProject, ModuleConfig, OutputKind, PythonModule, VersionPolicy};

pub fn execute(args: FlagsArgs) -> Result<()> {
    // Merge the config file (validated for recognized keys) with flags
    // given directly on the command line.
    let mut config = match args.config {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            ModuleConfig::from_toml_str(&text)
                .with_context(|| format!("invalid module config `{}`", path.display()))?
        }
        None => ModuleConfig::default(),
    };
    config.with.extend(args.with);
    config.delete.extend(args.delete);
    config.args.extend(args.probe_args);
    if args.min.is_some() {
        config.min = args.min;
    }

    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let kind = if args.static_lib {
        OutputKind::StaticLib
    } else {
        OutputKind::Exe
    };
    let mut build = HostProject::new(&project_dir).with_kind(kind);

    let mut module = PythonModule::new();
    if args.strict_min {
        module = module.with_version_policy(VersionPolicy::Deny);
    }
    if args.embed {
        module = module.with_embed(true);
    }

    module.init(&config)?;

    let compile_flags = if args.link {
        None
    } else {
        Some(module.compile(&mut build, &config)?)
    };
    let link_flags = if args.compile {
        None
    } else {
        Some(module.link(&mut build, &config)?)
    };

    if args.json {
        let payload = serde_json::json!({
            "compile": compile_flags,
            "link": link_flags,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    // Print what actually got registered on the build description.
    if compile_flags.is_some() {
        println!("# Compile flags:");

        for dir in &build.include_dirs {
            println!("  -I{}", dir.display());
        }

        if let Some(ref flags) = compile_flags {
            if !flags.cflags.is_empty() {
                println!("  {}", flags.cflags);
            }
        }
    }

    if compile_flags.is_some() && link_flags.is_some() {
        println!();
    }

    if link_flags.is_some() {
        println!("# Link flags:");

        for dir in &build.lib_dirs {
            println!("  -L{}", dir.display());
        }

        for lib in &build.libs {
            println!("  -l{}", lib);
        }

        for ldflags in &build.ldflags {
            println!("  {}", ldflags);
        }
    }

    Ok(())
}
