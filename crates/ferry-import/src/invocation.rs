//! Foreign compiler invocation: options, argument layout and resource
//! directory discovery.
//!
//! The foreign compiler parses one synthetic translation unit,
//! [`TRANSLATION_UNIT_NAME`], held in memory as a remapped file. Everything
//! else is command-line arguments, which are forwarded verbatim.

use std::path::{Path, PathBuf};

use crate::errors::CreateError;

/// Name of the synthetic translation unit.
pub const TRANSLATION_UNIT_NAME: &str = "ferry.m";

/// Contents of the synthetic translation unit. The single declaration keeps
/// the unit non-empty.
pub const TRANSLATION_UNIT_CONTENTS: &str = "extern int __ferry;\n";

/// Version directory of the foreign compiler's bundled resources.
pub const FOREIGN_RESOURCE_VERSION: &str = "3.5";

/// Arguments that never change between sessions.
const BASE_ARGS: &[&str] = &[
    "-x",
    "objective-c",
    "-fobjc-arc",
    "-fmodules",
    "-fblocks",
    "-fsyntax-only",
    "-w",
];

/// Options for constructing the foreign compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterOptions {
    sdk_root: PathBuf,
    target_triple: String,
    module_cache_path: Option<PathBuf>,
    import_search_paths: Vec<PathBuf>,
    framework_search_paths: Vec<PathBuf>,
    resource_dir: Option<PathBuf>,
}

impl ImporterOptions {
    pub fn new(sdk_root: impl Into<PathBuf>, target_triple: &str) -> Self {
        Self {
            sdk_root: sdk_root.into(),
            target_triple: target_triple.to_string(),
            module_cache_path: None,
            import_search_paths: Vec::new(),
            framework_search_paths: Vec::new(),
            resource_dir: None,
        }
    }

    /// Where the foreign compiler keeps its precompiled modules. Defaults to
    /// a directory under the system temp dir.
    pub fn with_module_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_cache_path = Some(path.into());
        self
    }

    /// Add a header search path (`-I`).
    pub fn with_import_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_search_paths.push(path.into());
        self
    }

    /// Add a framework search path (`-F`).
    pub fn with_framework_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.framework_search_paths.push(path.into());
        self
    }

    /// Use an explicit resource directory instead of the one installed next
    /// to the executable.
    pub fn with_resource_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(path.into());
        self
    }

    pub fn target_triple(&self) -> &str {
        &self.target_triple
    }

    pub fn module_cache_path(&self) -> PathBuf {
        self.module_cache_path
            .clone()
            .unwrap_or_else(default_module_cache_path)
    }

    /// Lay out the full argument list and the remapped translation unit.
    pub fn build_invocation(&self) -> Result<ForeignInvocation, CreateError> {
        let resource_dir = match &self.resource_dir {
            Some(dir) => dir.clone(),
            None => ResourceDirLocator::locate()?,
        };

        let mut args: Vec<String> = BASE_ARGS.iter().map(|a| a.to_string()).collect();
        args.push("-isysroot".to_string());
        args.push(path_arg(&self.sdk_root));
        args.push("-triple".to_string());
        args.push(self.target_triple.clone());
        args.push(TRANSLATION_UNIT_NAME.to_string());

        for path in &self.import_search_paths {
            args.push("-I".to_string());
            args.push(path_arg(path));
        }
        for path in &self.framework_search_paths {
            args.push("-F".to_string());
            args.push(path_arg(path));
        }
        args.push(format!(
            "-fmodules-cache-path={}",
            path_arg(&self.module_cache_path())
        ));
        args.push("-resource-dir".to_string());
        args.push(path_arg(&resource_dir));

        tracing::debug!(args = ?args, "built foreign invocation");
        Ok(ForeignInvocation {
            args,
            remapped_files: vec![RemappedFile {
                path: PathBuf::from(TRANSLATION_UNIT_NAME),
                contents: TRANSLATION_UNIT_CONTENTS.to_string(),
            }],
            target_triple: self.target_triple.clone(),
        })
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn default_module_cache_path() -> PathBuf {
    std::env::temp_dir().join("org.llvm.clang").join("ModuleCache")
}

/// An in-memory file the foreign compiler reads instead of the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything a [`ForeignCompilerFactory`](crate::ForeignCompilerFactory)
/// needs to build a compiler instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignInvocation {
    args: Vec<String>,
    remapped_files: Vec<RemappedFile>,
    target_triple: String,
}

impl ForeignInvocation {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn remapped_files(&self) -> &[RemappedFile] {
        &self.remapped_files
    }

    pub fn target_triple(&self) -> &str {
        &self.target_triple
    }
}

/// Finds the foreign compiler's resource directory relative to the running
/// executable.
pub struct ResourceDirLocator;

impl ResourceDirLocator {
    /// Resource directory for the current executable.
    pub fn locate() -> Result<PathBuf, CreateError> {
        let exe = std::env::current_exe().map_err(|e| CreateError::InvocationConstructionFailed {
            reason: format!("cannot locate the running executable: {e}"),
        })?;
        Self::for_executable(&exe)
    }

    /// Installed layout: `<prefix>/bin/<exe>` pairs with
    /// `<prefix>/lib/ferry/clang/<version>`.
    pub fn for_executable(exe: &Path) -> Result<PathBuf, CreateError> {
        let exe = exe
            .canonicalize()
            .map_err(|e| CreateError::InvocationConstructionFailed {
                reason: format!("cannot canonicalize '{}': {e}", exe.display()),
            })?;
        let prefix = exe.parent().and_then(Path::parent).ok_or_else(|| {
            CreateError::InvocationConstructionFailed {
                reason: format!("'{}' has no installation prefix", exe.display()),
            }
        })?;
        Ok(prefix
            .join("lib")
            .join("ferry")
            .join("clang")
            .join(FOREIGN_RESOURCE_VERSION))
    }
}
