//! Framebuffer presentation for the Nintendo Switch display.
//!
//! This crate moves the pixels an application draws into a linear framebuffer onto the
//! console's display layer:
//! - A [`PresentationSurfaceBinding`] pairs a host-allocated [`LinearFramebuffer`] with a
//!   [`HardwareSurface`], the application's handle on a layer's rotating buffer queue.
//! - Each present dequeues a free hardware buffer, copies the whole framebuffer into it through
//!   the block linear [`swizzle`] map (converting pixels to the layer's native format), and
//!   queues it back for scan-out.
//! - [`VideoDevice`] keeps one binding per window and exposes the single display mode.
//!
//! The VI/nvdrv services and the host windowing layer are reached only through the
//! [`DisplayLayers`] and [`WindowHost`] traits.

#![no_std]

extern crate alloc;

mod binding;
pub mod config;
mod device;
pub mod format;
pub mod surface;
pub mod swizzle;
pub mod window;

pub use self::{
    binding::{CreateBindingError, PresentError, PresentationSurfaceBinding},
    config::{DisplayMode, VIDEO_BOOTSTRAP, VideoBootstrap, VideoConfig},
    device::{DestroyError, VideoDevice, VideoInitError},
    format::PixelFormat,
    surface::{BufferSlot, DisplayLayers, HardwareSurface, LayerInfo},
    swizzle::{BlockLinearLayout, SurfaceLayout},
    window::{FramebufferInfo, LinearFramebuffer, Rect, WindowHost, WindowId},
};

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use nx_result::{Module, ResultCode};

    use super::*;

    const QUEUE_DEPTH: usize = 3;

    struct FakeLayer {
        id: u32,
        buffers: Vec<Vec<u32>>,
        free: Vec<u32>,
    }

    /// In-memory display with a fixed-depth buffer queue per layer.
    #[derive(Default)]
    struct FakeDisplay {
        layers: Vec<FakeLayer>,
        next_id: u32,
        inits: usize,
        finalizes: usize,
        opens: usize,
        closes: usize,
        cancels: usize,
        dequeues: usize,
        /// Frames handed to the compositor, in order.
        queued: Vec<(u32, BufferSlot, Vec<u32>)>,
        fail_init: bool,
        fail_open: bool,
        fail_dequeue: bool,
        fail_queue: bool,
        buffer_len_override: Option<usize>,
        layout_override: Option<SurfaceLayout>,
    }

    fn rc(description: u32) -> ResultCode {
        ResultCode::from_parts(Module::Vi, description)
    }

    impl FakeDisplay {
        fn layer(&mut self, id: u32) -> &mut FakeLayer {
            self.layers
                .iter_mut()
                .find(|layer| layer.id == id)
                .expect("layer is open")
        }
    }

    impl DisplayLayers for FakeDisplay {
        type Handle = u32;

        fn init(&mut self) -> Result<(), ResultCode> {
            self.inits += 1;
            if self.fail_init { Err(rc(1)) } else { Ok(()) }
        }

        fn finalize(&mut self) {
            self.finalizes += 1;
        }

        fn open_layer(&mut self, width: u32, height: u32) -> Result<LayerInfo<u32>, ResultCode> {
            if self.fail_open {
                return Err(rc(2));
            }

            let layout = self
                .layout_override
                .unwrap_or(SurfaceLayout::block_linear(width, height));
            let len = self.buffer_len_override.unwrap_or(layout.buffer_len());
            let id = self.next_id;
            self.next_id += 1;
            self.opens += 1;
            self.layers.push(FakeLayer {
                id,
                buffers: vec![vec![0; len]; QUEUE_DEPTH],
                free: (0..QUEUE_DEPTH as u32).collect(),
            });

            Ok(LayerInfo {
                handle: id,
                layout,
                format: PixelFormat::Abgr8888,
            })
        }

        fn dequeue_buffer(&mut self, layer: &u32) -> Result<BufferSlot, ResultCode> {
            if self.fail_dequeue {
                return Err(rc(3));
            }
            self.dequeues += 1;

            let layer = self.layer(*layer);
            // The compositor always has a buffer to give back in this fake.
            if layer.free.is_empty() {
                layer.free.extend(0..QUEUE_DEPTH as u32);
            }
            Ok(BufferSlot::new(layer.free.remove(0)))
        }

        fn buffer_mut(&mut self, layer: &u32, slot: BufferSlot) -> &mut [u32] {
            &mut self.layer(*layer).buffers[slot.to_raw() as usize]
        }

        fn queue_buffer(&mut self, layer: &u32, slot: BufferSlot) -> Result<(), ResultCode> {
            if self.fail_queue {
                return Err(rc(4));
            }

            let id = *layer;
            let frame = self.layer(id).buffers[slot.to_raw() as usize].clone();
            self.queued.push((id, slot, frame));
            Ok(())
        }

        fn cancel_buffer(&mut self, layer: &u32, slot: BufferSlot) {
            self.cancels += 1;
            self.layer(*layer).free.push(slot.to_raw());
        }

        fn close_layer(&mut self, layer: u32) {
            self.closes += 1;
            self.layers.retain(|l| l.id != layer);
        }
    }

    #[derive(Default)]
    struct FakeHost {
        size: (u32, u32),
        allocations: usize,
        frees: usize,
        out_of_memory: bool,
    }

    impl FakeHost {
        fn sized(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                ..Default::default()
            }
        }
    }

    impl WindowHost for FakeHost {
        fn window_size(&self, _window: WindowId) -> (u32, u32) {
            self.size
        }

        fn allocate_framebuffer(
            &mut self,
            width: u32,
            height: u32,
            format: PixelFormat,
        ) -> Option<LinearFramebuffer> {
            if self.out_of_memory {
                return None;
            }
            self.allocations += 1;
            Some(LinearFramebuffer::new(width, height, format))
        }

        fn free_framebuffer(&mut self, _framebuffer: LinearFramebuffer) {
            self.frees += 1;
        }
    }

    const WINDOW: WindowId = WindowId::new(1);

    fn device(display: FakeDisplay, host: FakeHost) -> VideoDevice<FakeDisplay, FakeHost> {
        VideoDevice::init(display, host, VideoConfig::default()).expect("video init")
    }

    fn fill(device: &mut VideoDevice<FakeDisplay, FakeHost>, rgba: [u8; 4]) {
        let fb = device.framebuffer_mut(WINDOW).expect("bound");
        let format = fb.format();
        fb.pixels_mut().fill(format.pack(rgba));
    }

    #[test]
    fn init_failure_is_reported() {
        let display = FakeDisplay {
            fail_init: true,
            ..Default::default()
        };

        let result = VideoDevice::init(display, FakeHost::sized(4, 4), VideoConfig::default());
        assert!(matches!(result, Err(VideoInitError::DisplayInitFailed(_))));
    }

    #[test]
    fn exposes_the_handheld_mode() {
        let device = device(FakeDisplay::default(), FakeHost::sized(4, 4));
        let mode = device.display_mode();

        assert_eq!(
            (mode.width, mode.height, mode.refresh_rate),
            (1280, 720, 60)
        );
        assert_eq!(mode.format, PixelFormat::Rgba8888);
        assert_eq!(VIDEO_BOOTSTRAP.name, "Switch");
        assert!(VIDEO_BOOTSTRAP.available());
    }

    #[test]
    fn create_uses_window_size_and_configured_format() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(32, 16));
        let info = device.create_window_framebuffer(WINDOW).expect("create");

        assert_eq!(info.format, PixelFormat::Rgba8888);
        assert_eq!((info.width, info.height, info.pitch), (32, 16, 128));
        assert_eq!(device.layers().opens, 1);
        assert!(device.is_bound(WINDOW));
    }

    #[test]
    fn rejects_a_foreign_pixel_format() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));
        let result = device.create_binding(8, 8, PixelFormat::Argb8888);

        assert!(matches!(
            result,
            Err(CreateBindingError::UnsupportedFormat(PixelFormat::Argb8888))
        ));
        assert_eq!(device.layers().opens, 0);
    }

    #[test]
    fn out_of_memory_opens_no_layer() {
        let host = FakeHost {
            out_of_memory: true,
            ..FakeHost::sized(8, 8)
        };
        let mut device = device(FakeDisplay::default(), host);

        let result = device.create_window_framebuffer(WINDOW);
        assert!(matches!(result, Err(CreateBindingError::OutOfMemory)));
        assert_eq!(device.layers().opens, 0);
        assert!(!device.is_bound(WINDOW));
    }

    #[test]
    fn layer_failure_releases_the_framebuffer() {
        let display = FakeDisplay {
            fail_open: true,
            ..Default::default()
        };
        let mut device = device(display, FakeHost::sized(8, 8));

        let result = device.create_window_framebuffer(WINDOW);
        assert!(matches!(
            result,
            Err(CreateBindingError::SurfaceCreationFailed(_))
        ));
        assert_eq!(device.host().allocations, 1);
        assert_eq!(device.host().frees, 1);
        assert!(!device.is_bound(WINDOW));
    }

    #[test]
    fn present_swizzles_and_converts_the_whole_framebuffer() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(20, 10));
        device.create_window_framebuffer(WINDOW).expect("create");

        let fb = device.framebuffer_mut(WINDOW).expect("bound");
        for (i, px) in fb.pixels_mut().iter_mut().enumerate() {
            *px = PixelFormat::Rgba8888.pack([i as u8, 0, 0, 0xFF]);
        }

        device.update_window_framebuffer(WINDOW, &[]).expect("present");

        let (_, _, frame) = &device.layers().queued[0];
        let layout = SurfaceLayout::block_linear(20, 10);
        for y in 0..10 {
            for x in 0..20 {
                let expected = PixelFormat::Abgr8888.pack([(y * 20 + x) as u8, 0, 0, 0xFF]);
                assert_eq!(frame[layout.offset(x, y)], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn unchanged_frames_are_still_submitted() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(16, 8));
        device.create_window_framebuffer(WINDOW).expect("create");
        fill(&mut device, [1, 2, 3, 4]);

        let first = device.update_window_framebuffer(WINDOW, &[]).expect("present");
        let second = device.update_window_framebuffer(WINDOW, &[]).expect("present");

        let display = device.layers();
        assert_ne!(first, second);
        assert_eq!(display.dequeues, 2);
        assert_eq!(display.queued.len(), 2);
        assert_eq!(display.queued[0].2, display.queued[1].2);
    }

    #[test]
    fn dirty_rects_do_not_limit_the_copy() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(16, 8));
        device.create_window_framebuffer(WINDOW).expect("create");
        fill(&mut device, [9, 9, 9, 9]);

        let dirty = [Rect {
            x: 0,
            y: 0,
            w: 1,
            h: 1,
        }];
        device.update_window_framebuffer(WINDOW, &dirty).expect("present");

        let expected = PixelFormat::Abgr8888.pack([9, 9, 9, 9]);
        let (_, _, frame) = &device.layers().queued[0];
        let layout = SurfaceLayout::block_linear(16, 8);
        assert_eq!(frame[layout.offset(15, 7)], expected);
    }

    #[test]
    fn present_on_unbound_window_is_not_fatal() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));

        assert!(matches!(
            device.update_window_framebuffer(WINDOW, &[]),
            Err(PresentError::BindingNotFound)
        ));
        assert!(matches!(
            device.destroy_window_framebuffer(WINDOW),
            Err(DestroyError::BindingNotFound)
        ));
    }

    #[test]
    fn dequeue_failure_keeps_the_binding() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));
        device.create_window_framebuffer(WINDOW).expect("create");

        device.layers_mut().fail_dequeue = true;
        assert!(matches!(
            device.update_window_framebuffer(WINDOW, &[]),
            Err(PresentError::DequeueFailed(_))
        ));
        assert!(device.is_bound(WINDOW));

        device.layers_mut().fail_dequeue = false;
        device.update_window_framebuffer(WINDOW, &[]).expect("retry");
        assert_eq!(device.layers().queued.len(), 1);
    }

    #[test]
    fn queue_failure_retries_the_same_buffer() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));
        device.create_window_framebuffer(WINDOW).expect("create");

        device.layers_mut().fail_queue = true;
        assert!(matches!(
            device.update_window_framebuffer(WINDOW, &[]),
            Err(PresentError::QueueFailed(_))
        ));

        device.layers_mut().fail_queue = false;
        let slot = device.update_window_framebuffer(WINDOW, &[]).expect("retry");

        let display = device.layers();
        assert_eq!(display.dequeues, 1);
        assert_eq!(display.queued.len(), 1);
        assert_eq!(display.queued[0].1, slot);
    }

    #[test]
    fn undersized_hardware_buffer_is_rejected() {
        let display = FakeDisplay {
            buffer_len_override: Some(16),
            ..Default::default()
        };
        let mut device = device(display, FakeHost::sized(16, 8));
        device.create_window_framebuffer(WINDOW).expect("create");

        assert!(matches!(
            device.update_window_framebuffer(WINDOW, &[]),
            Err(PresentError::BufferTooSmall {
                required: 2048,
                actual: 16
            })
        ));
    }

    #[test]
    fn undersized_buffer_is_handed_back() {
        let display = FakeDisplay {
            buffer_len_override: Some(16),
            ..Default::default()
        };
        let mut device = device(display, FakeHost::sized(16, 8));
        device.create_window_framebuffer(WINDOW).expect("create");

        for _ in 0..2 {
            assert!(matches!(
                device.update_window_framebuffer(WINDOW, &[]),
                Err(PresentError::BufferTooSmall { .. })
            ));
        }

        let display = device.layers();
        assert_eq!(display.dequeues, 2);
        assert_eq!(display.cancels, 2);
        assert!(display.queued.is_empty());
        assert_eq!(display.layers[0].free.len(), QUEUE_DEPTH);
    }

    #[test]
    fn narrow_pitch_layout_is_refused_at_create() {
        let display = FakeDisplay {
            layout_override: Some(SurfaceLayout::PitchLinear {
                width: 8,
                height: 8,
                stride: 4,
            }),
            ..Default::default()
        };
        let mut device = device(display, FakeHost::sized(8, 8));

        assert!(matches!(
            device.create_window_framebuffer(WINDOW),
            Err(CreateBindingError::InvalidLayout(SurfaceLayout::PitchLinear {
                stride: 4,
                ..
            }))
        ));
        assert!(!device.is_bound(WINDOW));
        assert!(matches!(
            device.update_window_framebuffer(WINDOW, &[]),
            Err(PresentError::BindingNotFound)
        ));

        assert_eq!(device.layers().opens, 1);
        assert_eq!(device.layers().closes, 1);
        assert_eq!(device.host().allocations, 1);
        assert_eq!(device.host().frees, 1);
    }

    #[test]
    fn pitch_linear_layer_is_presented_row_major() {
        let layout = SurfaceLayout::PitchLinear {
            width: 4,
            height: 2,
            stride: 6,
        };
        let display = FakeDisplay {
            layout_override: Some(layout),
            ..Default::default()
        };
        let mut device = device(display, FakeHost::sized(4, 2));
        device.create_window_framebuffer(WINDOW).expect("create");
        fill(&mut device, [9, 8, 7, 6]);

        device.update_window_framebuffer(WINDOW, &[]).expect("present");

        let (_, _, frame) = &device.layers().queued[0];
        let native = PixelFormat::Abgr8888.pack([9, 8, 7, 6]);
        assert_eq!(&frame[..4], &[native; 4]);
        assert_eq!(&frame[4..6], &[0, 0]);
        assert_eq!(&frame[6..10], &[native; 4]);
    }

    #[test]
    fn set_display_mode_changes_nothing() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(4, 4));
        let requested = DisplayMode {
            width: 1920,
            height: 1080,
            ..DisplayMode::HANDHELD
        };

        assert!(device.set_display_mode(&requested).is_ok());
        assert_eq!(device.display_mode(), DisplayMode::HANDHELD);
    }

    #[test]
    fn recreate_reuses_the_slot_without_leaking_layers() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));

        device.create_window_framebuffer(WINDOW).expect("create");
        device.destroy_window_framebuffer(WINDOW).expect("destroy");
        device.create_window_framebuffer(WINDOW).expect("create again");
        // creating over a live binding replaces it
        device.create_window_framebuffer(WINDOW).expect("create over");
        device.destroy_window_framebuffer(WINDOW).expect("destroy");

        let display = device.layers();
        assert_eq!(display.opens, 3);
        assert_eq!(display.closes, display.opens);
        assert!(display.layers.is_empty());
        assert_eq!(device.host().allocations, device.host().frees);
    }

    #[test]
    fn destroy_returns_a_held_buffer() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));
        device.create_window_framebuffer(WINDOW).expect("create");

        device.layers_mut().fail_queue = true;
        let _ = device.update_window_framebuffer(WINDOW, &[]);
        device.destroy_window_framebuffer(WINDOW).expect("destroy");

        assert_eq!(device.layers().cancels, 1);
        assert_eq!(device.layers().closes, 1);
    }

    #[test]
    fn quit_tears_down_every_binding() {
        let mut device = device(FakeDisplay::default(), FakeHost::sized(8, 8));
        device.create_window_framebuffer(WINDOW).expect("create");
        device
            .create_window_framebuffer(WindowId::new(2))
            .expect("create");

        let (display, host) = device.quit();
        assert_eq!(display.closes, 2);
        assert_eq!(display.finalizes, 1);
        assert_eq!(host.frees, 2);
    }
}
