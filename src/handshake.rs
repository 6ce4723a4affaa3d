use std::thread;

use tracing::{debug, info, warn};

use crate::consts::{COMMAND_SIZE, SYNC_FRAME};
use crate::error::{HandshakeError, TransportError};
use crate::protocol::commands::{decode_ack, decode_nack, decode_sync, encode, Ack, Command};
use crate::protocol::format_bytes;
use crate::transport::Transport;
use crate::types::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
	Present,
	NotPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
	Idle,
	Pulsing,
	AwaitingAck,
	AwaitingDeviceSync,
	Synced,
	Failed,
}

/// Synchronizes with the camera: pulse SYNC until it answers with an ACK,
/// then wait for its own SYNC and acknowledge that.
pub struct Handshake<'a> {
	timing: &'a Timing,
	state: HandshakeState,
	attempts: u8,
	received: Vec<u8>,
	ack_of_ack: Option<Ack>,
}

impl<'a> Handshake<'a> {
	pub fn new(timing: &'a Timing) -> Self {
		Self {
			timing,
			state: HandshakeState::Idle,
			attempts: 0,
			received: Vec::new(),
			ack_of_ack: None,
		}
	}

	pub fn state(&self) -> HandshakeState {
		self.state
	}

	pub fn attempts(&self) -> u8 {
		self.attempts
	}

	pub fn run<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<Presence, HandshakeError> {
		loop {
			if let Some(presence) = self.step(transport)? {
				return Ok(presence);
			}
		}
	}

	/// Performs one transition. Returns the outcome once a terminal state is reached.
	/// Any error leaves the machine in [`HandshakeState::Failed`].
	pub fn step<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<Option<Presence>, HandshakeError> {
		let outcome = self.advance(transport);
		if outcome.is_err() {
			self.state = HandshakeState::Failed;
		}
		outcome
	}

	fn advance<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<Option<Presence>, HandshakeError> {
		match self.state {
			HandshakeState::Idle => {
				self.attempts += 1;
				self.state = HandshakeState::Pulsing;
				Ok(None)
			}
			HandshakeState::Pulsing => {
				debug!(attempt = self.attempts, pulses = self.timing.sync_pulses, "pulsing SYNC");
				for _ in 0..self.timing.sync_pulses {
					thread::sleep(self.timing.pulse_interval);
					transport.write(&SYNC_FRAME)?;
				}
				match self.wait_for_frame(transport)? {
					Some(bytes) => {
						self.received = bytes;
						self.state = HandshakeState::AwaitingAck;
					}
					None if self.attempts < self.timing.sync_attempts => {
						warn!(attempt = self.attempts, "no answer to SYNC, retrying");
						self.attempts += 1;
					}
					None => return Ok(Some(self.fail())),
				}
				Ok(None)
			}
			HandshakeState::AwaitingAck => {
				let bytes = std::mem::take(&mut self.received);
				match decode_ack(&bytes) {
					Ok(ack) => {
						self.ack_of_ack = Some(Ack::relay(&ack));
						self.state = HandshakeState::AwaitingDeviceSync;
						Ok(None)
					}
					Err(_) if decode_nack(&bytes).is_ok() => {
						info!("camera answered SYNC with NACK");
						Ok(Some(self.fail()))
					}
					Err(_) => Err(HandshakeError::UnexpectedResponse {
						context: "neither an ACK nor a NACK was received when syncing the camera",
						bytes,
					}),
				}
			}
			HandshakeState::AwaitingDeviceSync => {
				let Some(bytes) = self.wait_for_frame(transport)? else {
					return Ok(Some(self.fail()));
				};
				if decode_sync(&bytes).is_err() {
					return Err(HandshakeError::UnexpectedResponse {
						context: "expected a SYNC command but didn't receive one",
						bytes,
					});
				}
				let frame = encode(&Command::Ack(self.ack_of_ack.unwrap_or_default()))?;
				debug!(frame = %format_bytes(&frame), "acknowledging camera SYNC");
				transport.write(&frame)?;
				self.ack_of_ack = None;
				self.state = HandshakeState::Synced;
				info!(attempts = self.attempts, "camera synchronized");
				Ok(Some(Presence::Present))
			}
			HandshakeState::Synced => Ok(Some(Presence::Present)),
			HandshakeState::Failed => Ok(Some(Presence::NotPresent)),
		}
	}

	fn fail(&mut self) -> Presence {
		self.state = HandshakeState::Failed;
		Presence::NotPresent
	}

	fn wait_for_frame<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<Option<Vec<u8>>, HandshakeError> {
		match transport.read_within(self.timing.response_timeout, COMMAND_SIZE) {
			Ok(bytes) => {
				debug!(frame = %format_bytes(&bytes), "recv");
				Ok(Some(bytes))
			}
			Err(TransportError::Timeout) => Ok(None),
			Err(e) => Err(e.into()),
		}
	}
}

/// Runs a full handshake. The camera being absent or asleep is reported as
/// [`Presence::NotPresent`], not as an error.
///
/// Every call pulses afresh. [`Camera::handshake`](crate::Camera::handshake)
/// remembers a synced session and returns at once when called again.
pub fn handshake<T: Transport + ?Sized>(transport: &mut T, timing: &Timing) -> Result<Presence, HandshakeError> {
	Handshake::new(timing).run(transport)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::consts::{CMD_ACK, CMD_SYNC};
	use crate::testing::{BreaksAfter, Reply, ScriptedTransport, SimulatedCamera};
	use std::time::Duration;

	fn fast() -> Timing {
		Timing {
			pulse_interval: Duration::ZERO,
			response_timeout: Duration::from_millis(1),
			..Timing::default()
		}
	}

	const SYNC_ACK: [u8; 6] = [0xAA, 0x0E, 0x0D, 0x05, 0x00, 0x00];
	const NACK: [u8; 6] = [0xAA, 0x0F, 0x00, 0x05, 0x01, 0x00];

	#[test]
	fn silent_camera_is_not_present() {
		let timing = fast();
		let mut t = ScriptedTransport::new([]);
		let mut hs = Handshake::new(&timing);
		assert_eq!(hs.run(&mut t).unwrap(), Presence::NotPresent);
		assert_eq!(hs.state(), HandshakeState::Failed);
		assert_eq!(hs.attempts(), 2);
		assert_eq!(t.written.len(), 2 * 59);
		assert!(t.written.iter().all(|f| f[..] == SYNC_FRAME));
		assert_eq!(t.reads, 2);
	}

	#[test]
	fn second_attempt_can_succeed() {
		let mut t = ScriptedTransport::new([
			Reply::Silence,
			Reply::Bytes(SYNC_ACK.to_vec()),
			Reply::Bytes(SYNC_FRAME.to_vec()),
		]);
		assert_eq!(handshake(&mut t, &fast()).unwrap(), Presence::Present);
		assert_eq!(t.written.len(), 2 * 59 + 1);
		assert_eq!(t.written.last().unwrap(), &vec![0xAA, 0x0E, 0x0D, 0x05, 0x00, 0x00]);
	}

	#[test]
	fn nack_is_not_present() {
		let mut t = ScriptedTransport::new([Reply::Bytes(NACK.to_vec())]);
		assert_eq!(handshake(&mut t, &fast()).unwrap(), Presence::NotPresent);
	}

	#[test]
	fn unrelated_frame_is_unexpected() {
		let mut t = ScriptedTransport::new([Reply::Bytes(vec![0xAA, 0x0A, 0x01, 0x00, 0x00, 0x00])]);
		let timing = fast();
		let mut hs = Handshake::new(&timing);
		let err = hs.run(&mut t).unwrap_err();
		assert!(matches!(err, HandshakeError::UnexpectedResponse { .. }));
		assert_eq!(hs.state(), HandshakeState::Failed);
	}

	#[test]
	fn missing_device_sync_is_not_present() {
		let mut t = ScriptedTransport::new([Reply::Bytes(SYNC_ACK.to_vec())]);
		assert_eq!(handshake(&mut t, &fast()).unwrap(), Presence::NotPresent);
		assert!(t.written.iter().all(|f| f[1] == CMD_SYNC));
	}

	#[test]
	fn wrong_frame_instead_of_device_sync() {
		let mut t = ScriptedTransport::new([Reply::Bytes(SYNC_ACK.to_vec()), Reply::Bytes(NACK.to_vec())]);
		assert!(matches!(
			handshake(&mut t, &fast()),
			Err(HandshakeError::UnexpectedResponse { .. })
		));
	}

	#[test]
	fn write_failure_is_terminal() {
		let timing = fast();
		let mut t = BreaksAfter::new(SimulatedCamera::new(Vec::new()), 59);
		let mut hs = Handshake::new(&timing);
		let err = hs.run(&mut t).unwrap_err();
		assert!(matches!(err, HandshakeError::Transport(TransportError::Closed)));
		assert_eq!(hs.state(), HandshakeState::Failed);
		assert!(!t.inner.synced);
		assert_eq!(hs.step(&mut t).unwrap(), Some(Presence::NotPresent));
	}

	#[test]
	fn pulse_write_failure_is_terminal() {
		let timing = fast();
		let mut t = BreaksAfter::new(ScriptedTransport::new([]), 10);
		let mut hs = Handshake::new(&timing);
		assert!(hs.step(&mut t).unwrap().is_none());
		assert!(hs.step(&mut t).is_err());
		assert_eq!(hs.state(), HandshakeState::Failed);
		assert_eq!(t.inner.written.len(), 10);
	}

	#[test]
	fn walks_every_state() {
		let timing = fast();
		let mut cam = SimulatedCamera::new(Vec::new());
		let mut hs = Handshake::new(&timing);
		let mut seen = vec![hs.state()];
		while hs.step(&mut cam).unwrap().is_none() {
			seen.push(hs.state());
		}
		seen.push(hs.state());
		assert_eq!(
			seen,
			[
				HandshakeState::Idle,
				HandshakeState::Pulsing,
				HandshakeState::AwaitingAck,
				HandshakeState::AwaitingDeviceSync,
				HandshakeState::Synced,
			]
		);
		assert!(cam.synced);
		assert_eq!(cam.frames_with_id(CMD_ACK), 1);
	}
}
