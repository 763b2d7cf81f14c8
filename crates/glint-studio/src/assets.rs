use std::path::{Path, PathBuf};

use glint_engine::shader::read_wgsl_file;

/// Relative to the executable: release layout first, then a build tree
/// (`target/<profile>/`).
const EXECUTABLE_RELATIVE_DIRS: [&str; 2] = ["./assets", "../../assets"];

const DEFAULT_FRAGMENT: &str = "shaders/default.wgsl";

const EMBEDDED_DEFAULT_FRAGMENT: &str = include_str!("../../../assets/shaders/default.wgsl");

/// Bundled asset directory, if one was found.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    root: Option<PathBuf>,
}

impl Assets {
    /// Looks next to the executable, then in the working directory.
    pub fn discover() -> Self {
        let mut candidates = Vec::new();

        match std::env::current_exe() {
            Ok(exe) => {
                if let Some(dir) = exe.parent() {
                    candidates.extend(EXECUTABLE_RELATIVE_DIRS.iter().map(|rel| dir.join(rel)));
                }
            }
            Err(err) => log::debug!("executable path unavailable: {err}"),
        }

        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join("assets"));
        }

        let root = find_root(&candidates);
        match &root {
            Some(path) => log::info!("assets directory found at \"{}\"", path.display()),
            None => log::info!("no assets directory found; using embedded shaders"),
        }

        Self { root }
    }

    /// Absolute path of `relative` inside the asset directory.
    pub fn get(&self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(relative))
    }

    /// User code shown when no shader file was given.
    pub fn default_fragment(&self) -> String {
        let Some(path) = self.get(DEFAULT_FRAGMENT) else {
            return EMBEDDED_DEFAULT_FRAGMENT.to_string();
        };

        match read_wgsl_file(&path) {
            Ok(code) => code,
            Err(err) => {
                log::warn!("{err}; using embedded default shader");
                EMBEDDED_DEFAULT_FRAGMENT.to_string()
            }
        }
    }

    pub fn embedded_default_fragment() -> &'static str {
        EMBEDDED_DEFAULT_FRAGMENT
    }
}

/// First existing directory among `candidates`, canonicalized.
fn find_root(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .filter(|path| path.is_dir())
        .find_map(|path| std::fs::canonicalize(path).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glint-assets-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn first_existing_candidate_wins() {
        let base = scratch_dir("order");
        let second = base.join("second");
        let third = base.join("third");
        std::fs::create_dir_all(&second).unwrap();
        std::fs::create_dir_all(&third).unwrap();

        let found = find_root(&[base.join("missing"), second.clone(), third]).unwrap();
        assert_eq!(found, std::fs::canonicalize(&second).unwrap());
    }

    #[test]
    fn files_are_not_asset_roots() {
        let base = scratch_dir("file");
        let file = base.join("assets");
        std::fs::write(&file, "").unwrap();

        assert_eq!(find_root(&[file]), None);
    }

    #[test]
    fn missing_directory_falls_back_to_embedded_shader() {
        let assets = Assets::default();
        assert_eq!(assets.default_fragment(), EMBEDDED_DEFAULT_FRAGMENT);
    }

    #[test]
    fn default_fragment_is_read_from_assets() {
        let base = scratch_dir("read");
        std::fs::create_dir_all(base.join("shaders")).unwrap();
        std::fs::write(base.join(DEFAULT_FRAGMENT), "// on disk").unwrap();

        let assets = Assets { root: Some(base) };
        assert_eq!(assets.default_fragment(), "// on disk");
    }

    #[test]
    fn embedded_default_compiles_with_prelude() {
        let code = crate::editor::Editor::new(EMBEDDED_DEFAULT_FRAGMENT).combined_code();
        glint_engine::shader::validate_fragment(&code, "default").unwrap();
    }

    #[test]
    fn bundled_samples_compile_with_prelude() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/shaders");
        let mut checked = 0;
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().and_then(|e| e.to_str()) != Some("wgsl") {
                continue;
            }
            let editor = crate::editor::Editor::from_file(&path).unwrap();
            let label = path.display().to_string();
            glint_engine::shader::validate_fragment(&editor.combined_code(), &label).unwrap();
            checked += 1;
        }
        assert!(checked >= 2, "expected the default and rings samples in {}", dir.display());
    }
}
