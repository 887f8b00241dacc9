//! Host windowing collaborator and the application-visible framebuffer.

use alloc::{boxed::Box, vec};

use crate::format::PixelFormat;

/// Identifies a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct WindowId(u32);

impl WindowId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

/// A dirty rectangle reported by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Linear, row-major 32-bit pixel buffer the application draws into.
///
/// Rows are `pitch` bytes apart; `pitch` is always a multiple of the pixel size.
pub struct LinearFramebuffer {
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
    pixels: Box<[u32]>,
}

impl LinearFramebuffer {
    /// Allocates a zeroed, tightly packed framebuffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pitch: width as usize * PixelFormat::BYTES_PER_PIXEL,
            format,
            pixels: vec![0; len].into_boxed_slice(),
        }
    }

    /// Wraps tightly packed pixels.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` holds fewer than `width * height` entries.
    pub fn from_pixels(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: impl Into<Box<[u32]>>,
    ) -> Self {
        Self::with_pitch(
            width,
            height,
            width as usize * PixelFormat::BYTES_PER_PIXEL,
            format,
            pixels,
        )
    }

    /// Wraps pixels whose rows are `pitch` bytes apart.
    ///
    /// # Panics
    ///
    /// Panics if `pitch` is not a multiple of 4, is narrower than a row, or if `pixels` is too
    /// short for `height` rows.
    pub fn with_pitch(
        width: u32,
        height: u32,
        pitch: usize,
        format: PixelFormat,
        pixels: impl Into<Box<[u32]>>,
    ) -> Self {
        let pixels = pixels.into();
        let stride = pitch / PixelFormat::BYTES_PER_PIXEL;
        assert_eq!(
            pitch % PixelFormat::BYTES_PER_PIXEL,
            0,
            "pitch must be pixel aligned"
        );
        assert!(stride >= width as usize, "pitch narrower than a row");
        assert!(
            pixels.len() >= stride * height as usize,
            "pixel buffer too short"
        );

        Self {
            width,
            height,
            pitch,
            format,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the start of consecutive rows.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }
}

impl core::fmt::Debug for LinearFramebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearFramebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// What the application needs to start drawing into a window framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferInfo {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
}

impl From<&LinearFramebuffer> for FramebufferInfo {
    fn from(fb: &LinearFramebuffer) -> Self {
        Self {
            format: fb.format(),
            width: fb.width(),
            height: fb.height(),
            pitch: fb.pitch(),
        }
    }
}

/// Host windowing layer.
///
/// The host owns framebuffer memory: it allocates a buffer when a window framebuffer is
/// created and gets it back when the binding is destroyed.
pub trait WindowHost {
    /// Current size of `window` in pixels.
    fn window_size(&self, window: WindowId) -> (u32, u32);

    /// Allocates a linear framebuffer, or `None` when memory is exhausted.
    fn allocate_framebuffer(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Option<LinearFramebuffer>;

    /// Returns a framebuffer obtained from [`allocate_framebuffer`](Self::allocate_framebuffer).
    fn free_framebuffer(&mut self, framebuffer: LinearFramebuffer);
}
