use super::{AspectPreset, ViewportError};

/// How the viewport's height (and width) is chosen.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Width follows the hosting panel, height follows the preset.
    #[default]
    AspectRatio,
    /// Both dimensions are set explicitly.
    Resolution,
}

/// Texture size in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone)]
pub struct ViewportConfig {
    pub mode: DisplayMode,
    pub preset: AspectPreset,
    /// Automatic requests narrower than this are dropped.
    ///
    /// Panels report a few pixels wide while the first layout settles.
    pub min_auto_width: u32,
    /// Clear color of the viewport pass, under whatever the fragment stage writes.
    pub clear_color: wgpu::Color,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::AspectRatio,
            preset: AspectPreset::default(),
            min_auto_width: 32,
            clear_color: wgpu::Color::BLACK,
        }
    }
}

/// CPU half of the viewport: current size, mode, preset and the pending-resize
/// mailbox.
///
/// The mailbox holds at most one request; a newer one replaces an unapplied
/// one. Nothing here touches the GPU.
#[derive(Debug, Clone)]
pub struct ViewportSizing {
    mode: DisplayMode,
    preset: AspectPreset,
    min_auto_width: u32,
    max_dimension: u32,

    current: Extent,
    /// Last panel width seen in `AspectRatio` mode.
    panel_width: u32,
    /// Last explicit resolution, restored when switching back to `Resolution`.
    resolution: Extent,

    pending: Option<Extent>,
}

impl ViewportSizing {
    /// Sizing for a viewport whose panel is `panel_width` pixels wide.
    ///
    /// The initial extent is derived the same way an automatic request would
    /// be, but without the minimum-width filter.
    pub fn new(
        config: &ViewportConfig,
        panel_width: u32,
        max_dimension: u32,
    ) -> Result<Self, ViewportError> {
        let auto = Extent::new(panel_width, config.preset.derive_height(panel_width));
        check_extent(auto, max_dimension)?;

        Ok(Self {
            mode: config.mode,
            preset: config.preset,
            min_auto_width: config.min_auto_width,
            max_dimension,
            current: auto,
            panel_width,
            resolution: auto,
            pending: None,
        })
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn preset(&self) -> AspectPreset {
        self.preset
    }

    /// Extent of the texture as last applied.
    pub fn current(&self) -> Extent {
        self.current
    }

    pub fn pending(&self) -> Option<Extent> {
        self.pending
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Height over width of the image as it should be displayed.
    pub fn current_inverse_ratio(&self) -> f32 {
        match self.mode {
            DisplayMode::AspectRatio => self.preset.inverse_value(),
            // Zero extents never get committed.
            DisplayMode::Resolution => self.current.height as f32 / self.current.width as f32,
        }
    }

    /// Records a resize request.
    ///
    /// Without `height`, the height is derived from `width` and the preset.
    /// Such automatic requests below the minimum width are suppressed and
    /// return `Ok(None)`. Zero or oversized extents are rejected and leave any
    /// earlier request in place.
    pub fn set_pending_resize(
        &mut self,
        width: u32,
        height: Option<u32>,
    ) -> Result<Option<Extent>, ViewportError> {
        let extent = match height {
            Some(height) => Extent::new(width, height),
            None => {
                if width < self.min_auto_width {
                    log::debug!(
                        "suppressing automatic viewport resize to width {width} (< {})",
                        self.min_auto_width
                    );
                    return Ok(None);
                }
                Extent::new(width, self.preset.derive_height(width))
            }
        };

        check_extent(extent, self.max_dimension)?;

        if let Some(old) = self.pending.replace(extent) {
            log::trace!(
                "pending resize {}x{} replaced by {}x{}",
                old.width,
                old.height,
                extent.width,
                extent.height
            );
        }

        Ok(Some(extent))
    }

    /// Reports the hosting panel's content width.
    ///
    /// Only requests a resize in `AspectRatio` mode and only when the width
    /// differs from the previous report.
    pub fn observe_panel_width(&mut self, width: u32) -> Result<Option<Extent>, ViewportError> {
        if width == self.panel_width {
            return Ok(None);
        }
        self.panel_width = width;

        match self.mode {
            DisplayMode::AspectRatio => self.set_pending_resize(width, None),
            DisplayMode::Resolution => Ok(None),
        }
    }

    /// Explicit `width` x `height` request for `Resolution` mode.
    ///
    /// Remembered so that switching modes back and forth restores it.
    pub fn request_resolution(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Option<Extent>, ViewportError> {
        let requested = self.set_pending_resize(width, Some(height))?;
        self.resolution = Extent::new(width, height);
        Ok(requested)
    }

    /// Switches mode and requests a resize under the new rule.
    ///
    /// A rejected request keeps the previous mode.
    pub fn set_mode(&mut self, mode: DisplayMode) -> Result<Option<Extent>, ViewportError> {
        let previous = std::mem::replace(&mut self.mode, mode);
        let requested = match mode {
            DisplayMode::AspectRatio => self.set_pending_resize(self.panel_width, None),
            DisplayMode::Resolution => {
                let Extent { width, height } = self.resolution;
                self.set_pending_resize(width, Some(height))
            }
        };
        if requested.is_err() {
            self.mode = previous;
        }
        requested
    }

    /// Switches preset; in `AspectRatio` mode this re-derives the height.
    ///
    /// A rejected request keeps the previous preset.
    pub fn set_ratio_preset(
        &mut self,
        preset: AspectPreset,
    ) -> Result<Option<Extent>, ViewportError> {
        let previous = std::mem::replace(&mut self.preset, preset);
        let requested = match self.mode {
            DisplayMode::AspectRatio => self.set_pending_resize(self.panel_width, None),
            DisplayMode::Resolution => Ok(None),
        };
        if requested.is_err() {
            self.preset = previous;
        }
        requested
    }

    /// Reads and clears the mailbox.
    pub fn take_pending(&mut self) -> Option<Extent> {
        self.pending.take()
    }

    /// Marks `extent` as the size of the live texture.
    pub(crate) fn commit(&mut self, extent: Extent) {
        self.current = extent;
    }
}

pub(crate) fn check_extent(extent: Extent, max: u32) -> Result<(), ViewportError> {
    let Extent { width, height } = extent;
    if width == 0 || height == 0 {
        return Err(ViewportError::ZeroExtent { width, height });
    }
    if width > max || height > max {
        return Err(ViewportError::TooLarge { width, height, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 8192;

    fn sizing(mode: DisplayMode, panel_width: u32) -> ViewportSizing {
        let config = ViewportConfig {
            mode,
            ..ViewportConfig::default()
        };
        ViewportSizing::new(&config, panel_width, MAX).unwrap()
    }

    // ── initial sizing ────────────────────────────────────────────────────

    #[test]
    fn initial_extent_follows_default_preset() {
        let s = sizing(DisplayMode::AspectRatio, 640);
        assert_eq!(s.current(), Extent::new(640, 360));
        assert_eq!(s.pending(), None);
    }

    #[test]
    fn initial_zero_width_is_rejected() {
        let err = ViewportSizing::new(&ViewportConfig::default(), 0, MAX).unwrap_err();
        assert!(matches!(err, ViewportError::ZeroExtent { .. }));
    }

    // ── mailbox ───────────────────────────────────────────────────────────

    #[test]
    fn derived_height_matches_sixteen_by_nine_for_many_widths() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        for w in (32..4096).step_by(7) {
            let requested = s.set_pending_resize(w, None).unwrap();
            assert_eq!(requested, Some(Extent::new(w, w * 9 / 16)), "width {w}");
            assert_eq!(s.take_pending(), Some(Extent::new(w, w * 9 / 16)));
        }
    }

    #[test]
    fn newer_request_overwrites_unapplied_one() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        s.set_pending_resize(800, None).unwrap();
        s.set_pending_resize(1024, None).unwrap();

        assert_eq!(s.take_pending(), Some(Extent::new(1024, 576)));
    }

    #[test]
    fn take_is_read_and_clear() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        s.set_pending_resize(800, Some(600)).unwrap();

        assert_eq!(s.take_pending(), Some(Extent::new(800, 600)));
        assert_eq!(s.take_pending(), None);
    }

    #[test]
    fn zero_extent_is_rejected_and_keeps_earlier_request() {
        let mut s = sizing(DisplayMode::Resolution, 640);
        s.request_resolution(320, 240).unwrap();

        let err = s.request_resolution(0, 480).unwrap_err();
        assert!(matches!(
            err,
            ViewportError::ZeroExtent {
                width: 0,
                height: 480
            }
        ));
        assert_eq!(s.pending(), Some(Extent::new(320, 240)));
    }

    #[test]
    fn oversized_extent_is_rejected() {
        let mut s = sizing(DisplayMode::Resolution, 640);
        let err = s.request_resolution(MAX + 1, 10).unwrap_err();
        assert!(matches!(err, ViewportError::TooLarge { max: MAX, .. }));
        assert_eq!(s.pending(), None);
    }

    #[test]
    fn narrow_automatic_requests_are_suppressed() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        assert_eq!(s.set_pending_resize(16, None).unwrap(), None);
        assert_eq!(s.pending(), None);

        // Explicit sizes are never filtered.
        assert_eq!(
            s.set_pending_resize(16, Some(9)).unwrap(),
            Some(Extent::new(16, 9))
        );
    }

    // ── panel tracking ────────────────────────────────────────────────────

    #[test]
    fn panel_width_change_requests_resize_once() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        assert_eq!(s.observe_panel_width(640).unwrap(), None);

        assert_eq!(
            s.observe_panel_width(700).unwrap(),
            Some(Extent::new(700, 393))
        );
        s.take_pending();
        assert_eq!(s.observe_panel_width(700).unwrap(), None);
    }

    #[test]
    fn panel_width_is_ignored_in_resolution_mode() {
        let mut s = sizing(DisplayMode::Resolution, 640);
        assert_eq!(s.observe_panel_width(900).unwrap(), None);
        assert_eq!(s.pending(), None);
    }

    // ── mode and preset switches ──────────────────────────────────────────

    #[test]
    fn preset_switch_rederives_height() {
        let mut s = sizing(DisplayMode::AspectRatio, 600);
        s.set_ratio_preset(AspectPreset::Classic3x2).unwrap();
        assert_eq!(s.take_pending(), Some(Extent::new(600, 400)));

        s.set_ratio_preset(AspectPreset::Square).unwrap();
        assert_eq!(s.take_pending(), Some(Extent::new(600, 600)));
    }

    #[test]
    fn preset_switch_in_resolution_mode_keeps_size() {
        let mut s = sizing(DisplayMode::Resolution, 600);
        assert_eq!(s.set_ratio_preset(AspectPreset::Square).unwrap(), None);
        assert_eq!(s.preset(), AspectPreset::Square);
    }

    #[test]
    fn mode_round_trip_restores_explicit_resolution() {
        let mut s = sizing(DisplayMode::Resolution, 640);
        s.request_resolution(256, 256).unwrap();
        s.take_pending();

        s.set_mode(DisplayMode::AspectRatio).unwrap();
        assert_eq!(s.take_pending(), Some(Extent::new(640, 360)));

        s.set_mode(DisplayMode::Resolution).unwrap();
        assert_eq!(s.take_pending(), Some(Extent::new(256, 256)));
    }

    #[test]
    fn rejected_preset_switch_keeps_previous_preset() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        assert!(s.observe_panel_width(MAX + 1).is_err());

        let err = s.set_ratio_preset(AspectPreset::Square).unwrap_err();
        assert!(matches!(err, ViewportError::TooLarge { .. }));
        assert_eq!(s.preset(), AspectPreset::Widescreen16x9);
        assert_eq!(s.pending(), None);
    }

    #[test]
    fn rejected_mode_switch_keeps_previous_mode() {
        let mut s = sizing(DisplayMode::Resolution, 640);
        assert_eq!(s.observe_panel_width(MAX + 1).unwrap(), None);

        let err = s.set_mode(DisplayMode::AspectRatio).unwrap_err();
        assert!(matches!(err, ViewportError::TooLarge { .. }));
        assert_eq!(s.mode(), DisplayMode::Resolution);
        assert_eq!(s.pending(), None);
    }

    #[test]
    fn inverse_ratio_depends_on_mode() {
        let mut s = sizing(DisplayMode::AspectRatio, 640);
        assert_eq!(s.current_inverse_ratio(), 0.5625);

        s.set_mode(DisplayMode::Resolution).unwrap();
        s.commit(Extent::new(400, 100));
        assert_eq!(s.current_inverse_ratio(), 0.25);
    }
}
