use std::time::Duration;

use crate::consts::*;
use crate::types::{JpegResolution, PictureType};

#[derive(Debug, Clone)]
pub struct Timing {
	pub sync_pulses: u8,
	pub sync_attempts: u8,
	pub pulse_interval: Duration,
	pub response_timeout: Duration,
}

impl Default for Timing {
	fn default() -> Self {
		Self {
			sync_pulses: SYNC_PULSES,
			sync_attempts: SYNC_ATTEMPTS,
			pulse_interval: PULSE_INTERVAL,
			response_timeout: RESPONSE_TIMEOUT,
		}
	}
}

/// How the device ends a transfer whose length is an exact multiple of the
/// payload capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastPacketPolicy {
	/// The last counted packet is a full one.
	#[default]
	FullPacket,
	/// One extra packet carrying only header and verify code follows.
	TrailingEmpty,
}

#[derive(Debug, Clone)]
pub struct CaptureRequest {
	pub resolution: JpegResolution,
	pub picture: PictureType,
	pub packet_size: u16,
	pub skip_frames: u16,
	pub last_packet: LastPacketPolicy,
}

impl Default for CaptureRequest {
	fn default() -> Self {
		Self {
			resolution: JpegResolution::default(),
			picture: PictureType::Snapshot,
			packet_size: DEFAULT_PACKET_SIZE,
			skip_frames: 0,
			last_packet: LastPacketPolicy::default(),
		}
	}
}

impl CaptureRequest {
	pub fn new(resolution: JpegResolution, packet_size: u16) -> Self {
		Self {
			resolution,
			packet_size,
			..Self::default()
		}
	}
}
