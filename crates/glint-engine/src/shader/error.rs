use std::path::PathBuf;

/// Failures while loading or validating shader source.
///
/// Returned before any GPU object is created from the source, so callers can
/// keep their previous shader/pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("\"{}\" does not exist or is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("\"{}\" is not a WGSL shader (does not end with .{extension})", path.display())]
    WrongExtension {
        path: PathBuf,
        extension: &'static str,
    },

    #[error("failed to read \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{label}: WGSL parse error\n{diagnostic}")]
    Parse { label: String, diagnostic: String },

    #[error("{label}: WGSL validation error: {diagnostic}")]
    Validation { label: String, diagnostic: String },

    #[error("{label}: no `@fragment fn {entry}` entry point")]
    MissingEntryPoint { label: String, entry: &'static str },

    #[error("{label}: fragment input @location({location}) is not provided by the vertex stage")]
    UnsupportedInput { label: String, location: u32 },

    #[error("{label}: fragment output @location({location}) has no color target")]
    UnsupportedOutput { label: String, location: u32 },

    #[error(
        "{label}: resource @group({group}) @binding({binding}) is not bound; only the uniform block at @group(0) @binding(0) is available"
    )]
    UnsupportedBinding {
        label: String,
        group: u32,
        binding: u32,
    },
}
