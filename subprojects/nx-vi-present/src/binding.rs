//! Association between an application framebuffer and a hardware surface.

use nx_result::ResultCode;

use crate::{
    format::PixelFormat,
    surface::{BufferSlot, DisplayLayers, HardwareSurface},
    swizzle::{self, SurfaceLayout},
    window::{LinearFramebuffer, Rect, WindowHost},
};

/// A window framebuffer bound to one open display layer.
///
/// The framebuffer memory belongs to the [`WindowHost`]; it is handed back on
/// [`destroy`](Self::destroy).
#[derive(Debug)]
pub struct PresentationSurfaceBinding<H> {
    framebuffer: LinearFramebuffer,
    surface: HardwareSurface<H>,
}

impl<H> PresentationSurfaceBinding<H> {
    /// Allocates the application framebuffer and opens a hardware layer for it.
    ///
    /// If the layer cannot be opened, or reports a layout its buffers cannot address, the layer
    /// is closed and the framebuffer freed again before returning.
    pub fn create<L, W>(
        layers: &mut L,
        host: &mut W,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, CreateBindingError>
    where
        L: DisplayLayers<Handle = H>,
        W: WindowHost,
    {
        let framebuffer = host
            .allocate_framebuffer(width, height, format)
            .ok_or(CreateBindingError::OutOfMemory)?;

        let surface = match HardwareSurface::open(layers, width, height) {
            Ok(surface) => surface,
            Err(err) => {
                tracing::warn!(%err, "failed to open display layer");
                host.free_framebuffer(framebuffer);
                return Err(CreateBindingError::SurfaceCreationFailed(err));
            }
        };

        let layout = *surface.layout();
        if !layout.is_addressable() {
            tracing::warn!(?layout, "display layer reported an unusable layout");
            surface.close(layers);
            host.free_framebuffer(framebuffer);
            return Err(CreateBindingError::InvalidLayout(layout));
        }

        Ok(Self {
            framebuffer,
            surface,
        })
    }

    /// Copies the whole framebuffer into a hardware buffer and queues it for display.
    ///
    /// `_dirty` is a hint only; every call performs a full-surface copy and a fresh submission.
    /// Blocks until the layer has a free buffer.
    pub fn present<L>(
        &mut self,
        layers: &mut L,
        _dirty: &[Rect],
    ) -> Result<BufferSlot, PresentError>
    where
        L: DisplayLayers<Handle = H>,
    {
        let slot = self
            .surface
            .dequeue(layers)
            .map_err(PresentError::DequeueFailed)?;

        let layout = *self.surface.layout();
        let buffer = layers.buffer_mut(self.surface.handle(), slot);
        let actual = buffer.len();
        if actual < layout.buffer_len() {
            self.surface.cancel(layers);
            return Err(PresentError::BufferTooSmall {
                required: layout.buffer_len(),
                actual,
            });
        }

        swizzle::blit(buffer, &layout, self.surface.format(), &self.framebuffer);

        self.surface
            .queue(layers)
            .map_err(PresentError::QueueFailed)?;
        tracing::trace!(slot = slot.to_raw(), "queued framebuffer");

        Ok(slot)
    }

    /// Closes the hardware layer and returns the framebuffer to the host.
    pub fn destroy<L, W>(self, layers: &mut L, host: &mut W)
    where
        L: DisplayLayers<Handle = H>,
        W: WindowHost,
    {
        self.surface.close(layers);
        host.free_framebuffer(self.framebuffer);
    }

    #[inline]
    pub fn framebuffer(&self) -> &LinearFramebuffer {
        &self.framebuffer
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut LinearFramebuffer {
        &mut self.framebuffer
    }

    #[inline]
    pub fn surface(&self) -> &HardwareSurface<H> {
        &self.surface
    }
}

/// Error from [`PresentationSurfaceBinding::create`].
#[derive(Debug, thiserror::Error)]
pub enum CreateBindingError {
    /// The backend only accepts its configured pixel format.
    #[error("unsupported pixel format {0:?}")]
    UnsupportedFormat(PixelFormat),
    /// The host could not allocate the framebuffer.
    #[error("out of memory allocating framebuffer")]
    OutOfMemory,
    /// The display layer could not be opened.
    #[error("failed to open display layer")]
    SurfaceCreationFailed(#[source] ResultCode),
    /// The display layer described buffers that cannot hold its own surface.
    #[error("display layer reported an unusable layout {0:?}")]
    InvalidLayout(SurfaceLayout),
}

/// Error from [`PresentationSurfaceBinding::present`].
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// No binding is recorded for the window.
    #[error("no framebuffer bound to window")]
    BindingNotFound,
    /// The layer refused to hand out a buffer.
    #[error("failed to dequeue buffer")]
    DequeueFailed(#[source] ResultCode),
    /// The layer refused the filled buffer.
    #[error("failed to queue buffer")]
    QueueFailed(#[source] ResultCode),
    /// The dequeued buffer cannot hold the surface layout. The buffer is cancelled.
    #[error("hardware buffer holds {actual} pixels, layout needs {required}")]
    BufferTooSmall { required: usize, actual: usize },
}
