use std::path::{Path, PathBuf};

use super::ShaderError;

/// Extension every shader file must carry.
pub const WGSL_EXTENSION: &str = "wgsl";

/// Reads a WGSL shader file.
///
/// The path is resolved for diagnostics, then checked for existence, being a
/// regular file, and the `.wgsl` extension before anything is read. Errors
/// name the resolved path.
pub fn read_wgsl_file(path: &Path) -> Result<String, ShaderError> {
    let resolved = resolve(path);

    let is_file = std::fs::metadata(&resolved)
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ShaderError::NotAFile { path: resolved });
    }

    if resolved.extension().and_then(|e| e.to_str()) != Some(WGSL_EXTENSION) {
        return Err(ShaderError::WrongExtension {
            path: resolved,
            extension: WGSL_EXTENSION,
        });
    }

    std::fs::read_to_string(&resolved).map_err(|source| ShaderError::Read {
        path: resolved,
        source,
    })
}

/// Canonical path when it exists, otherwise the absolute form of `path`.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
