use std::path::{Path, PathBuf};

use glint_engine::shader::{ShaderError, read_wgsl_file};
use glint_engine::viewport::FRAGMENT_PRELUDE;

/// Fragment source buffer: a fixed prelude plus the user's code.
///
/// Only the visible part is user code. When the buffer was opened from a
/// file, [`reload`](Editor::reload) re-reads it so edits made in an external
/// editor are picked up on "Run".
#[derive(Debug, Clone)]
pub struct Editor {
    prefix: &'static str,
    visible_code: String,
    path: Option<PathBuf>,
}

impl Editor {
    pub fn new(visible_code: impl Into<String>) -> Self {
        Self {
            prefix: FRAGMENT_PRELUDE,
            visible_code: visible_code.into(),
            path: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ShaderError> {
        let code = read_wgsl_file(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::new(code)
        })
    }

    pub fn visible_code(&self) -> &str {
        &self.visible_code
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Prelude and user code, as compiled.
    pub fn combined_code(&self) -> String {
        format!("{}\n\n{}", self.prefix, self.visible_code)
    }

    /// Re-reads the backing file, if any.
    ///
    /// Returns whether the visible code changed. On error the buffer keeps
    /// its previous contents.
    pub fn reload(&mut self) -> Result<bool, ShaderError> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let code = read_wgsl_file(path)?;
        if code == self.visible_code {
            return Ok(false);
        }

        self.visible_code = code;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glint-editor-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn combined_code_starts_with_prelude() {
        let editor = Editor::new("// user");
        let combined = editor.combined_code();

        assert!(combined.starts_with(FRAGMENT_PRELUDE));
        assert!(combined.ends_with("\n\n// user"));
    }

    #[test]
    fn buffer_without_file_never_reloads() {
        let mut editor = Editor::new("// user");
        assert!(!editor.reload().unwrap());
        assert_eq!(editor.visible_code(), "// user");
    }

    #[test]
    fn reload_picks_up_file_changes() {
        let path = scratch_file("reload.wgsl", "// one");
        let mut editor = Editor::from_file(&path).unwrap();
        assert_eq!(editor.visible_code(), "// one");
        assert!(!editor.reload().unwrap());

        std::fs::write(&path, "// two").unwrap();
        assert!(editor.reload().unwrap());
        assert_eq!(editor.visible_code(), "// two");
    }

    #[test]
    fn failed_reload_keeps_buffer() {
        let path = scratch_file("vanishing.wgsl", "// kept");
        let mut editor = Editor::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(editor.reload().is_err());
        assert_eq!(editor.visible_code(), "// kept");
    }

    #[test]
    fn non_wgsl_file_is_refused() {
        let path = scratch_file("notes.txt", "hello");
        assert!(matches!(
            Editor::from_file(&path),
            Err(ShaderError::WrongExtension { .. })
        ));
    }
}
