//! Destination addressing for hardware display buffers.
//!
//! The display engine scans out of buffers stored in the Tegra X1 _block linear_ layout. The
//! surface is cut into GOBs (Groups Of Bytes) of 64 bytes x 8 rows, a vertical stack of
//! `2^block_height_log2` GOBs forms a block, and blocks are laid out row-major across the
//! surface. With 32-bit pixels a GOB covers 16 x 8 pixels.
//!
//! Inside a GOB the byte offset of `(x_bytes, y)` is assembled from the coordinate bits:
//!
//! ```text
//! ((x_bytes % 64) / 32) * 256 + ((y % 8) / 2) * 64 + ((x_bytes % 32) / 16) * 32
//!     + (y % 2) * 16 + (x_bytes % 16)
//! ```
//!
//! All offsets in this module are in _pixels_ (`u32` units), not bytes.

use crate::{format::PixelFormat, window::LinearFramebuffer};

/// Width of a GOB, in 32-bit pixels.
pub const GOB_WIDTH: u32 = 64 / PixelFormat::BYTES_PER_PIXEL as u32;
/// Height of a GOB, in rows.
pub const GOB_HEIGHT: u32 = 8;
/// Pixels in a GOB.
pub const GOB_PIXELS: usize = (GOB_WIDTH * GOB_HEIGHT) as usize;

/// Block height used by the display layer buffers (16 GOBs).
pub const DEFAULT_BLOCK_HEIGHT_LOG2: u32 = 4;

/// Largest block height the hardware supports (32 GOBs).
pub const MAX_BLOCK_HEIGHT_LOG2: u32 = 5;

/// Block linear surface geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLinearLayout {
    width: u32,
    height: u32,
    block_height_log2: u32,
}

impl BlockLinearLayout {
    /// Creates a layout for a `width` x `height` surface.
    ///
    /// `block_height_log2` is clamped to [`MAX_BLOCK_HEIGHT_LOG2`].
    pub const fn new(width: u32, height: u32, block_height_log2: u32) -> Self {
        let block_height_log2 = if block_height_log2 > MAX_BLOCK_HEIGHT_LOG2 {
            MAX_BLOCK_HEIGHT_LOG2
        } else {
            block_height_log2
        };

        Self {
            width,
            height,
            block_height_log2,
        }
    }

    /// Visible width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Visible height in rows.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub const fn block_height_log2(&self) -> u32 {
        self.block_height_log2
    }

    /// Rows covered by one block.
    #[inline]
    pub const fn block_rows(&self) -> u32 {
        GOB_HEIGHT << self.block_height_log2
    }

    /// Width rounded up to a whole number of GOBs.
    #[inline]
    pub const fn aligned_width(&self) -> u32 {
        self.width.div_ceil(GOB_WIDTH) * GOB_WIDTH
    }

    /// Height rounded up to a whole number of blocks.
    #[inline]
    pub const fn aligned_height(&self) -> u32 {
        self.height.div_ceil(self.block_rows()) * self.block_rows()
    }

    /// Number of pixels the backing buffer must hold.
    #[inline]
    pub const fn buffer_len(&self) -> usize {
        self.aligned_width() as usize * self.aligned_height() as usize
    }

    /// Offset of pixel `(x, y)` in the backing buffer.
    ///
    /// Total over the aligned rectangle and a bijection from it onto `0..buffer_len()`.
    #[inline]
    pub const fn offset(&self, x: u32, y: u32) -> usize {
        swizzle_offset(x, y, self.aligned_width(), self.block_height_log2)
    }
}

/// Block linear offset of pixel `(x, y)` in a surface `aligned_width` pixels wide.
///
/// `aligned_width` must be a multiple of [`GOB_WIDTH`].
pub const fn swizzle_offset(x: u32, y: u32, aligned_width: u32, block_height_log2: u32) -> usize {
    let block_rows = GOB_HEIGHT << block_height_log2;
    let gobs_per_block = 1usize << block_height_log2;
    let blocks_per_row = (aligned_width / GOB_WIDTH) as usize;

    let block_x = (x / GOB_WIDTH) as usize;
    let block_y = (y / block_rows) as usize;
    let gob_in_block = ((y % block_rows) / GOB_HEIGHT) as usize;

    let block_base = (block_y * blocks_per_row + block_x) * gobs_per_block * GOB_PIXELS;
    let gob_base = block_base + gob_in_block * GOB_PIXELS;

    let x = x as usize;
    let y = y as usize;
    let within_gob = ((x % 16) / 8) * 64
        + ((y % 8) / 2) * 16
        + ((x % 8) / 4) * 8
        + (y % 2) * 4
        + (x % 4);

    gob_base + within_gob
}

/// Memory layout of a hardware buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceLayout {
    /// Tegra block linear tiling.
    BlockLinear(BlockLinearLayout),
    /// Plain row-major rows of `stride` pixels.
    PitchLinear { width: u32, height: u32, stride: u32 },
}

impl SurfaceLayout {
    /// Block linear layout with the display's default block height.
    pub const fn block_linear(width: u32, height: u32) -> Self {
        Self::BlockLinear(BlockLinearLayout::new(
            width,
            height,
            DEFAULT_BLOCK_HEIGHT_LOG2,
        ))
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        match self {
            Self::BlockLinear(layout) => layout.width(),
            Self::PitchLinear { width, .. } => *width,
        }
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        match self {
            Self::BlockLinear(layout) => layout.height(),
            Self::PitchLinear { height, .. } => *height,
        }
    }

    /// Number of pixels a buffer in this layout must hold.
    #[inline]
    pub const fn buffer_len(&self) -> usize {
        match self {
            Self::BlockLinear(layout) => layout.buffer_len(),
            Self::PitchLinear { height, stride, .. } => *stride as usize * *height as usize,
        }
    }

    /// Whether every pixel of the `width` x `height` rectangle maps inside
    /// [`buffer_len`](Self::buffer_len).
    ///
    /// Only a pitch linear layout with rows narrower than its width can fail this.
    #[inline]
    pub const fn is_addressable(&self) -> bool {
        match self {
            Self::BlockLinear(_) => true,
            Self::PitchLinear { width, stride, .. } => *stride >= *width,
        }
    }

    /// Destination offset of pixel `(x, y)`.
    #[inline]
    pub const fn offset(&self, x: u32, y: u32) -> usize {
        match self {
            Self::BlockLinear(layout) => layout.offset(x, y),
            Self::PitchLinear { stride, .. } => y as usize * *stride as usize + x as usize,
        }
    }
}

/// Linear source offset of pixel `(x, y)` in a framebuffer whose rows are `pitch` bytes apart.
#[inline]
pub const fn linear_offset(x: u32, y: u32, pitch: usize) -> usize {
    y as usize * (pitch / PixelFormat::BYTES_PER_PIXEL) + x as usize
}

/// Copies the whole of `src` into `dst`, remapping addresses to `layout` and converting
/// every pixel to `dst_format`.
///
/// Only the rectangle shared by the framebuffer and the layout is written. `layout` must be
/// [addressable](SurfaceLayout::is_addressable) and `dst` must hold at least
/// [`SurfaceLayout::buffer_len`] pixels.
pub fn blit(
    dst: &mut [u32],
    layout: &SurfaceLayout,
    dst_format: PixelFormat,
    src: &LinearFramebuffer,
) {
    debug_assert!(layout.is_addressable());
    debug_assert!(dst.len() >= layout.buffer_len());

    let width = src.width().min(layout.width());
    let height = src.height().min(layout.height());
    let pixels = src.pixels();
    let pitch = src.pitch();
    let src_format = src.format();

    for y in 0..height {
        for x in 0..width {
            let pixel = pixels[linear_offset(x, y, pitch)];
            dst[layout.offset(x, y)] = crate::format::convert(pixel, src_format, dst_format);
        }
    }
}
