//! Window framebuffer driver built on [`PresentationSurfaceBinding`].

use alloc::collections::BTreeMap;

use nx_result::ResultCode;

use crate::{
    binding::{CreateBindingError, PresentError, PresentationSurfaceBinding},
    config::{DisplayMode, VideoConfig},
    format::PixelFormat,
    surface::{BufferSlot, DisplayLayers},
    window::{FramebufferInfo, LinearFramebuffer, Rect, WindowHost, WindowId},
};

/// Video device: one display, one mode, one framebuffer binding per window.
pub struct VideoDevice<L: DisplayLayers, W> {
    layers: L,
    host: W,
    config: VideoConfig,
    bindings: BTreeMap<WindowId, PresentationSurfaceBinding<L::Handle>>,
}

impl<L: DisplayLayers, W: WindowHost> VideoDevice<L, W> {
    /// Initializes the display subsystem.
    pub fn init(mut layers: L, host: W, config: VideoConfig) -> Result<Self, VideoInitError> {
        layers.init().map_err(|err| {
            tracing::warn!(%err, "display init failed");
            VideoInitError::DisplayInitFailed(err)
        })?;
        tracing::debug!(mode = ?config.display_mode, "video initialized");

        Ok(Self {
            layers,
            host,
            config,
            bindings: BTreeMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// The only display mode.
    #[inline]
    pub fn display_mode(&self) -> DisplayMode {
        self.config.display_mode
    }

    /// Accepts the only supported mode; nothing to reprogram.
    pub fn set_display_mode(&mut self, _mode: &DisplayMode) -> Result<(), ResultCode> {
        Ok(())
    }

    #[inline]
    pub fn layers(&self) -> &L {
        &self.layers
    }

    #[inline]
    pub fn layers_mut(&mut self) -> &mut L {
        &mut self.layers
    }

    #[inline]
    pub fn host(&self) -> &W {
        &self.host
    }

    /// Creates the framebuffer for `window` at its current size.
    ///
    /// A binding already recorded for the window is destroyed first and its slot reused.
    pub fn create_window_framebuffer(
        &mut self,
        window: WindowId,
    ) -> Result<FramebufferInfo, CreateBindingError> {
        if let Some(previous) = self.bindings.remove(&window) {
            tracing::debug!(window = window.to_raw(), "replacing window framebuffer");
            previous.destroy(&mut self.layers, &mut self.host);
        }

        let (width, height) = self.host.window_size(window);
        let binding = self.create_binding(width, height, self.config.pixel_format)?;
        let info = FramebufferInfo::from(binding.framebuffer());
        self.bindings.insert(window, binding);

        tracing::debug!(
            window = window.to_raw(),
            width,
            height,
            "created window framebuffer"
        );
        Ok(info)
    }

    /// Creates an unrecorded binding of `width` x `height` in `format`.
    pub fn create_binding(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<PresentationSurfaceBinding<L::Handle>, CreateBindingError> {
        if format != self.config.pixel_format {
            return Err(CreateBindingError::UnsupportedFormat(format));
        }

        PresentationSurfaceBinding::create(&mut self.layers, &mut self.host, width, height, format)
    }

    /// Presents the framebuffer of `window`.
    pub fn update_window_framebuffer(
        &mut self,
        window: WindowId,
        rects: &[Rect],
    ) -> Result<BufferSlot, PresentError> {
        let Some(binding) = self.bindings.get_mut(&window) else {
            tracing::warn!(
                window = window.to_raw(),
                "couldn't find framebuffer data for window"
            );
            return Err(PresentError::BindingNotFound);
        };

        binding.present(&mut self.layers, rects).inspect_err(|err| {
            tracing::warn!(window = window.to_raw(), %err, "present failed");
        })
    }

    /// Destroys the framebuffer of `window`, closing its layer.
    pub fn destroy_window_framebuffer(&mut self, window: WindowId) -> Result<(), DestroyError> {
        let Some(binding) = self.bindings.remove(&window) else {
            tracing::warn!(
                window = window.to_raw(),
                "no framebuffer to destroy for window"
            );
            return Err(DestroyError::BindingNotFound);
        };

        binding.destroy(&mut self.layers, &mut self.host);
        tracing::debug!(window = window.to_raw(), "destroyed window framebuffer");
        Ok(())
    }

    /// Pixels the application draws into for `window`.
    pub fn framebuffer_mut(&mut self, window: WindowId) -> Option<&mut LinearFramebuffer> {
        self.bindings
            .get_mut(&window)
            .map(PresentationSurfaceBinding::framebuffer_mut)
    }

    /// Whether a framebuffer is bound to `window`.
    #[inline]
    pub fn is_bound(&self, window: WindowId) -> bool {
        self.bindings.contains_key(&window)
    }

    /// Destroys every remaining binding and disconnects from the display.
    pub fn quit(mut self) -> (L, W) {
        while let Some((_, binding)) = self.bindings.pop_first() {
            binding.destroy(&mut self.layers, &mut self.host);
        }

        self.layers.finalize();
        tracing::debug!("video finalized");
        (self.layers, self.host)
    }
}

/// Error from [`VideoDevice::init`].
#[derive(Debug, thiserror::Error)]
pub enum VideoInitError {
    #[error("failed to initialize display")]
    DisplayInitFailed(#[source] ResultCode),
}

/// Error from [`VideoDevice::destroy_window_framebuffer`].
#[derive(Debug, thiserror::Error)]
pub enum DestroyError {
    /// No binding is recorded for the window.
    #[error("no framebuffer bound to window")]
    BindingNotFound,
}
