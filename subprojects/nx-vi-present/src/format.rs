//! Fixed 32-bit pixel formats and per-pixel channel reordering.
//!
//! Formats are named after the packed `u32` channel order, most significant byte first, so
//! `Rgba8888` stores red in bits 24-31. The display layer's native order is
//! [`PixelFormat::Abgr8888`], which places red in the lowest byte (`R, G, B, A` in memory on a
//! little-endian CPU).

/// Pixel format of a 32-bit framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// `0xRRGGBBAA`
    Rgba8888,
    /// `0xAARRGGBB`
    Argb8888,
    /// `0xAABBGGRR`
    Abgr8888,
}

impl PixelFormat {
    /// Every format is 32 bits wide.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Splits a packed pixel into `[r, g, b, a]`.
    #[inline]
    pub const fn unpack(self, pixel: u32) -> [u8; 4] {
        let [b0, b1, b2, b3] = pixel.to_be_bytes();
        match self {
            PixelFormat::Rgba8888 => [b0, b1, b2, b3],
            PixelFormat::Argb8888 => [b1, b2, b3, b0],
            PixelFormat::Abgr8888 => [b3, b2, b1, b0],
        }
    }

    /// Packs `[r, g, b, a]` into this format.
    #[inline]
    pub const fn pack(self, rgba: [u8; 4]) -> u32 {
        let [r, g, b, a] = rgba;
        let bytes = match self {
            PixelFormat::Rgba8888 => [r, g, b, a],
            PixelFormat::Argb8888 => [a, r, g, b],
            PixelFormat::Abgr8888 => [a, b, g, r],
        };
        u32::from_be_bytes(bytes)
    }
}

/// Converts a single pixel between two formats.
#[inline]
pub const fn convert(pixel: u32, from: PixelFormat, to: PixelFormat) -> u32 {
    if from as u8 == to as u8 {
        return pixel;
    }
    to.pack(from.unpack(pixel))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_OPAQUE: [u8; 4] = [0xFF, 0x00, 0x00, 0xFF];

    #[test]
    fn packs_red_in_every_order() {
        assert_eq!(PixelFormat::Rgba8888.pack(RED_OPAQUE), 0xFF00_00FF);
        assert_eq!(PixelFormat::Argb8888.pack(RED_OPAQUE), 0xFFFF_0000);
        assert_eq!(PixelFormat::Abgr8888.pack(RED_OPAQUE), 0xFF00_00FF);
    }

    #[test]
    fn argb_to_abgr_swaps_red_and_blue() {
        let px = PixelFormat::Argb8888.pack([0x11, 0x22, 0x33, 0x44]);
        assert_eq!(px, 0x4411_2233);
        assert_eq!(
            convert(px, PixelFormat::Argb8888, PixelFormat::Abgr8888),
            0x4433_2211
        );
    }

    #[test]
    fn same_format_is_identity() {
        assert_eq!(
            convert(0xDEAD_BEEF, PixelFormat::Rgba8888, PixelFormat::Rgba8888),
            0xDEAD_BEEF
        );
    }

    #[test]
    fn unpack_inverts_pack() {
        let rgba = [1, 2, 3, 4];
        for format in [
            PixelFormat::Rgba8888,
            PixelFormat::Argb8888,
            PixelFormat::Abgr8888,
        ] {
            assert_eq!(format.unpack(format.pack(rgba)), rgba);
        }
    }
}
