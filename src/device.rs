use tracing::info;

use crate::capture::capture_picture_with;
use crate::error::CameraError;
use crate::handshake::{Handshake, HandshakeState, Presence};
use crate::protocol::commands::{Command, Reset, SetBaudRate, SetLightFrequency};
use crate::protocol::exchange::send_with_ack;
use crate::transport::{SerialTransport, Transport};
use crate::types::{BaudRate, CaptureRequest, LightFrequency, ResetType, Timing};

pub struct Camera<T: Transport> {
	transport: T,
	timing: Timing,
	synced: bool,
}

impl Camera<SerialTransport> {
	pub fn open(path: &str, baud_rate: u32) -> Result<Self, CameraError> {
		let transport = SerialTransport::open(path, baud_rate)?;
		Ok(Camera::new(transport, Timing::default()))
	}

	/// Speed the host port is currently running at.
	pub fn baud_rate(&self) -> Result<u32, CameraError> {
		Ok(self.transport.baud_rate()?)
	}

	/// Switches the camera and then the host port to `rate`.
	pub fn set_baud_rate(&mut self, rate: BaudRate) -> Result<(), CameraError> {
		self.send(&Command::SetBaudRate(SetBaudRate::new(rate)))?;
		self.transport.set_baud_rate(rate.bps())?;
		info!(baud = rate.bps(), "baud rate changed");
		Ok(())
	}
}

impl<T: Transport> Camera<T> {
	pub fn new(transport: T, timing: Timing) -> Self {
		Self {
			transport,
			timing,
			synced: false,
		}
	}

	pub fn is_synced(&self) -> bool {
		self.synced
	}

	pub fn handshake(&mut self) -> Result<Presence, CameraError> {
		if self.synced {
			return Ok(Presence::Present);
		}
		let mut machine = Handshake::new(&self.timing);
		let presence = machine.run(&mut self.transport)?;
		self.synced = machine.state() == HandshakeState::Synced;
		Ok(presence)
	}

	pub fn capture<F>(&mut self, request: &CaptureRequest, progress: F) -> Result<Vec<u8>, CameraError>
	where
		F: FnMut(usize, usize),
	{
		self.require_sync()?;
		Ok(capture_picture_with(&mut self.transport, request, &self.timing, progress)?)
	}

	pub fn reset(&mut self, kind: ResetType, immediate: bool) -> Result<(), CameraError> {
		self.send(&Command::Reset(Reset::new(kind, immediate)))?;
		if kind == ResetType::WholeSystem {
			self.synced = false;
		}
		Ok(())
	}

	pub fn power_off(&mut self) -> Result<(), CameraError> {
		self.send(&Command::PowerOff)?;
		self.synced = false;
		Ok(())
	}

	pub fn set_light_frequency(&mut self, frequency: LightFrequency) -> Result<(), CameraError> {
		self.send(&Command::LightFrequency(SetLightFrequency::new(frequency)))
	}

	fn send(&mut self, command: &Command) -> Result<(), CameraError> {
		self.require_sync()?;
		send_with_ack(&mut self.transport, command, self.timing.response_timeout)?;
		Ok(())
	}

	fn require_sync(&self) -> Result<(), CameraError> {
		if !self.synced {
			return Err(CameraError::NotSynced);
		}
		Ok(())
	}
}
