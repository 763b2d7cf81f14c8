//! glint studio: a live WGSL fragment shader editor.
//!
//! Usage: `glint-studio [shader.wgsl]`. The file is compiled on start and
//! re-read on every Run (F5 or Ctrl+Enter). Sample shaders live in
//! `assets/shaders/`, e.g. `glint-studio assets/shaders/rings.wgsl`.

mod app;
mod assets;
mod code_panel;
mod controls;
mod editor;
mod layout;
mod present;

use std::path::PathBuf;

use anyhow::Context;

use glint_engine::device::GpuInit;
use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::viewport::ViewportConfig;
use glint_engine::window::{Runtime, RuntimeConfig};

use crate::app::Studio;
use crate::assets::Assets;
use crate::editor::Editor;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let shader_path = std::env::args_os().nth(1).map(PathBuf::from);

    let editor = match shader_path {
        Some(path) => Editor::from_file(&path).context("cannot open shader")?,
        None => Editor::new(Assets::discover().default_fragment()),
    };

    let config = RuntimeConfig {
        title: "glint".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(
        config,
        GpuInit::default(),
        Studio::new(editor, ViewportConfig::default()),
    )
}
