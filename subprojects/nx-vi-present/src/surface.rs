//! Hardware display layers and their rotating buffer queues.
//!
//! A layer owns a small pool of GPU-visible buffers driven through the IGraphicBufferProducer
//! protocol: [`dequeue_buffer`](DisplayLayers::dequeue_buffer) checks out a free slot,
//! [`buffer_mut`](DisplayLayers::buffer_mut) exposes its pixels and
//! [`queue_buffer`](DisplayLayers::queue_buffer) hands it back for scan-out.

use nx_result::ResultCode;

use crate::{format::PixelFormat, swizzle::SurfaceLayout};

/// Index of a buffer in a layer's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BufferSlot(u32);

impl BufferSlot {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

/// Description of an opened layer.
#[derive(Debug)]
pub struct LayerInfo<H> {
    /// Collaborator-specific layer handle.
    pub handle: H,
    /// Memory layout of every buffer in the layer's queue.
    pub layout: SurfaceLayout,
    /// Native pixel format of the layer's buffers.
    pub format: PixelFormat,
}

/// Display subsystem (VI + nvdrv) collaborator.
///
/// Every call is synchronous. `dequeue_buffer` blocks the calling thread until the compositor
/// releases a buffer and has no cancellation.
pub trait DisplayLayers {
    /// Handle of an opened layer.
    type Handle;

    /// Connects to the display service.
    fn init(&mut self) -> Result<(), ResultCode>;

    /// Disconnects from the display service.
    fn finalize(&mut self);

    /// Opens a layer on the default display sized `width` x `height`.
    fn open_layer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<LayerInfo<Self::Handle>, ResultCode>;

    /// Checks out a free buffer.
    fn dequeue_buffer(&mut self, layer: &Self::Handle) -> Result<BufferSlot, ResultCode>;

    /// Pixels of a checked-out buffer.
    fn buffer_mut(&mut self, layer: &Self::Handle, slot: BufferSlot) -> &mut [u32];

    /// Submits a checked-out buffer for display.
    fn queue_buffer(&mut self, layer: &Self::Handle, slot: BufferSlot) -> Result<(), ResultCode>;

    /// Returns a checked-out buffer without displaying it.
    fn cancel_buffer(&mut self, _layer: &Self::Handle, _slot: BufferSlot) {}

    /// Closes a layer, releasing its buffer queue.
    fn close_layer(&mut self, layer: Self::Handle);
}

/// Hardware surface bound to one open layer.
///
/// Tracks the single buffer that may be checked out at a time.
#[derive(Debug)]
pub struct HardwareSurface<H> {
    handle: H,
    layout: SurfaceLayout,
    format: PixelFormat,
    checked_out: Option<BufferSlot>,
}

impl<H> HardwareSurface<H> {
    /// Opens a new layer through `layers`.
    pub fn open<L>(layers: &mut L, width: u32, height: u32) -> Result<Self, ResultCode>
    where
        L: DisplayLayers<Handle = H>,
    {
        let info = layers.open_layer(width, height)?;
        tracing::debug!(width, height, layout = ?info.layout, "opened display layer");

        Ok(Self {
            handle: info.handle,
            layout: info.layout,
            format: info.format,
            checked_out: None,
        })
    }

    #[inline]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    #[inline]
    pub fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    /// Native pixel format of the layer.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The buffer currently checked out, if any.
    #[inline]
    pub fn checked_out(&self) -> Option<BufferSlot> {
        self.checked_out
    }

    /// Checks out a buffer, reusing one still held from a failed queue.
    pub fn dequeue<L>(&mut self, layers: &mut L) -> Result<BufferSlot, ResultCode>
    where
        L: DisplayLayers<Handle = H>,
    {
        if let Some(slot) = self.checked_out {
            return Ok(slot);
        }

        let slot = layers.dequeue_buffer(&self.handle)?;
        self.checked_out = Some(slot);
        Ok(slot)
    }

    /// Queues the checked-out buffer.
    ///
    /// On failure the buffer stays checked out.
    pub fn queue<L>(&mut self, layers: &mut L) -> Result<(), ResultCode>
    where
        L: DisplayLayers<Handle = H>,
    {
        let Some(slot) = self.checked_out else {
            return Ok(());
        };

        layers.queue_buffer(&self.handle, slot)?;
        self.checked_out = None;
        Ok(())
    }

    /// Returns the checked-out buffer, if any, without queueing it.
    pub fn cancel<L>(&mut self, layers: &mut L)
    where
        L: DisplayLayers<Handle = H>,
    {
        if let Some(slot) = self.checked_out.take() {
            layers.cancel_buffer(&self.handle, slot);
            tracing::trace!(slot = slot.to_raw(), "cancelled buffer");
        }
    }

    /// Returns any checked-out buffer and closes the layer.
    pub fn close<L>(mut self, layers: &mut L)
    where
        L: DisplayLayers<Handle = H>,
    {
        self.cancel(layers);
        layers.close_layer(self.handle);
        tracing::debug!("closed display layer");
    }
}
