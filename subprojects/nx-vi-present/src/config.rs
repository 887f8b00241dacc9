//! Video backend configuration, resolved once when the device is initialized.

use crate::format::PixelFormat;

/// The single display mode the console panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
    pub format: PixelFormat,
}

impl DisplayMode {
    /// 720p at 60 Hz, the handheld panel's native mode.
    pub const HANDHELD: Self = Self {
        width: 1280,
        height: 720,
        refresh_rate: 60,
        format: PixelFormat::Rgba8888,
    };
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::HANDHELD
    }
}

/// Video backend configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConfig {
    /// The only format window framebuffers are created with.
    pub pixel_format: PixelFormat,
    pub display_mode: DisplayMode,
}

impl VideoConfig {
    /// Configuration with framebuffers in `format`.
    pub const fn with_format(format: PixelFormat) -> Self {
        Self {
            pixel_format: format,
            display_mode: DisplayMode {
                format,
                ..DisplayMode::HANDHELD
            },
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self::with_format(PixelFormat::Rgba8888)
    }
}

/// Registration entry for the host runtime's video driver table.
#[derive(Debug, Clone, Copy)]
pub struct VideoBootstrap {
    pub name: &'static str,
    pub description: &'static str,
}

impl VideoBootstrap {
    /// The console display is always present.
    #[inline]
    pub const fn available(&self) -> bool {
        true
    }
}

/// The Switch video driver entry.
pub const VIDEO_BOOTSTRAP: VideoBootstrap = VideoBootstrap {
    name: "Switch",
    description: "Video driver for Nintendo Switch",
};
