//! Joystick driver: one logical device synthesized from the handheld and No1 Npad entries.

use nx_result::ResultCode;

use crate::{
    buttons::BUTTON_COUNT,
    config::JoystickConfig,
    snapshot::{ControllerSlot, DeviceAddress, SnapshotProvider},
    state::{ChangeEvent, ChangeEvents, LogicalControllerState},
};

/// Name reported for the logical device.
pub const DEVICE_NAME: &str = "Nintendo Switch JoyCon Controller";

/// Combined controller source (Joy-Cons attached to the console).
pub const PRIMARY_SLOT: ControllerSlot = ControllerSlot::Handheld;

/// Detachable controller source.
pub const SECONDARY_SLOT: ControllerSlot = ControllerSlot::No(1);

/// HID service collaborator.
///
/// `init`/`finalize` bracket the process-wide HID session. Snapshots are only valid between
/// them.
pub trait InputSubsystem: SnapshotProvider {
    fn init(&mut self) -> Result<(), ResultCode>;

    fn finalize(&mut self);
}

/// Host event sink. Events are fire-and-forget.
pub trait EventSink {
    fn publish_axis(&mut self, device: JoystickId, axis: u8, value: i16);

    fn publish_button(&mut self, device: JoystickId, button: u8, pressed: bool);
}

/// Instance id of an opened joystick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct JoystickId(i32);

impl JoystickId {
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> i32 {
        self.0
    }
}

/// Stable 16-byte device identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct JoystickGuid(pub [u8; 16]);

impl JoystickGuid {
    /// The controller address, zero-extended.
    pub fn from_address(address: &DeviceAddress) -> Self {
        let mut data = [0u8; 16];
        data[..address.len()].copy_from_slice(address);
        Self(data)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// An opened logical joystick.
#[derive(Debug)]
pub struct Joystick {
    id: JoystickId,
    state: LogicalControllerState,
}

impl Joystick {
    #[inline]
    pub fn instance_id(&self) -> JoystickId {
        self.id
    }

    #[inline]
    pub fn num_axes(&self) -> usize {
        self.state.num_axes()
    }

    #[inline]
    pub fn num_buttons(&self) -> usize {
        BUTTON_COUNT
    }

    #[inline]
    pub fn num_hats(&self) -> usize {
        0
    }

    /// Attach/detach is not tracked; an open joystick is always attached.
    #[inline]
    pub fn attached(&self) -> bool {
        true
    }

    #[inline]
    pub fn state(&self) -> &LogicalControllerState {
        &self.state
    }
}

/// Joystick driver over an [`InputSubsystem`].
pub struct JoystickDriver<S> {
    subsystem: S,
    config: JoystickConfig,
    initialized: bool,
}

impl<S: InputSubsystem> JoystickDriver<S> {
    pub fn new(subsystem: S, config: JoystickConfig) -> Self {
        Self {
            subsystem,
            config,
            initialized: false,
        }
    }

    #[inline]
    pub fn subsystem(&self) -> &S {
        &self.subsystem
    }

    #[inline]
    pub fn subsystem_mut(&mut self) -> &mut S {
        &mut self.subsystem
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Initializes the HID session and returns the number of devices.
    ///
    /// Calling it again while initialized does nothing.
    pub fn init(&mut self) -> Result<usize, OpenError> {
        if !self.initialized {
            self.subsystem.init().map_err(|err| {
                tracing::warn!(%err, "HID init failed");
                OpenError::HardwareInitFailed(err)
            })?;
            self.initialized = true;
            tracing::debug!("HID initialized");
        }

        Ok(self.num_joysticks())
    }

    /// One device while the HID session is up, none otherwise.
    #[inline]
    pub fn num_joysticks(&self) -> usize {
        usize::from(self.initialized)
    }

    /// Controller attach/detach is not detected.
    #[inline]
    pub fn detect(&mut self) {}

    fn check_index(&self, index: usize) -> Result<(), OpenError> {
        if index < self.num_joysticks() {
            Ok(())
        } else {
            Err(OpenError::InvalidDeviceIndex(index))
        }
    }

    pub fn device_name(&self, index: usize) -> Option<&'static str> {
        self.check_index(index).ok().map(|()| DEVICE_NAME)
    }

    /// The device index doubles as the instance id; there is never more than one device.
    pub fn instance_id(&self, index: usize) -> Option<JoystickId> {
        self.check_index(index)
            .ok()
            .map(|()| JoystickId::new(index as i32))
    }

    /// GUID of the controller backing device `index`.
    pub fn device_guid(&self, index: usize) -> Option<JoystickGuid> {
        self.check_index(index).ok()?;
        let slot = ControllerSlot::from_device_index(index)?;
        Some(JoystickGuid::from_address(
            &self.subsystem.snapshot(slot).address,
        ))
    }

    /// GUID of an opened joystick; identical to [`device_guid`](Self::device_guid) of its index.
    pub fn joystick_guid(&self, joystick: &Joystick) -> JoystickGuid {
        usize::try_from(joystick.id.to_raw())
            .ok()
            .and_then(ControllerSlot::from_device_index)
            .map(|slot| JoystickGuid::from_address(&self.subsystem.snapshot(slot).address))
            .unwrap_or_default()
    }

    /// Opens device `index` with every channel released.
    ///
    /// Initializes the HID session if it is not up yet.
    pub fn open(&mut self, index: usize) -> Result<Joystick, OpenError> {
        self.init()?;
        self.check_index(index)?;

        let state = LogicalControllerState::new(self.config);
        tracing::debug!(
            index,
            axes = state.num_axes(),
            buttons = state.num_buttons(),
            "opened joystick"
        );

        Ok(Joystick {
            id: JoystickId::new(index as i32),
            state,
        })
    }

    /// Reads both controllers and publishes every channel that changed since the last poll.
    ///
    /// Never blocks. Returns the published events.
    pub fn update(
        &mut self,
        joystick: &mut Joystick,
        sink: &mut impl EventSink,
    ) -> Result<ChangeEvents, UpdateError> {
        if !self.initialized {
            tracing::warn!("joystick polled without a HID session");
            return Err(UpdateError::NotInitialized);
        }

        let primary = self.subsystem.snapshot(PRIMARY_SLOT);
        let secondary = self.subsystem.snapshot(SECONDARY_SLOT);
        let events = joystick.state.poll(&primary, &secondary);

        for event in &events {
            tracing::trace!(?event, "joystick event");
            match *event {
                ChangeEvent::AxisChanged { axis, value } => {
                    sink.publish_axis(joystick.id, axis, value)
                }
                ChangeEvent::ButtonChanged { button, pressed } => {
                    sink.publish_button(joystick.id, button as u8, pressed)
                }
            }
        }

        Ok(events)
    }

    /// Closes `joystick` and finalizes the HID session.
    pub fn close(&mut self, joystick: Joystick) {
        tracing::debug!(id = joystick.id.to_raw(), "closing joystick");
        self.subsystem.finalize();
        self.initialized = false;
    }

    /// Driver-wide cleanup; the session is already finalized by [`close`](Self::close).
    pub fn quit(&mut self) {}
}

/// Error from [`JoystickDriver::open`] and [`JoystickDriver::init`].
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// The HID session could not be started; no device is available.
    #[error("failed to initialize HID")]
    HardwareInitFailed(#[source] ResultCode),
    #[error("no joystick at device index {0}")]
    InvalidDeviceIndex(usize),
}

/// Error from [`JoystickDriver::update`].
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The HID session is not up.
    #[error("HID is not initialized")]
    NotInitialized,
}
