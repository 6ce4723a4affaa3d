use std::io;
use thiserror::Error;

use crate::consts::{COMMAND_SIZE, PREFIX_BYTE};
use crate::protocol::format_bytes;
use crate::types::DataType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
	#[error("expected {size} command bytes, received {0}", size = COMMAND_SIZE)]
	Length(usize),
	#[error("invalid prefix byte {received:#04x}, expected {prefix:#04x}", prefix = PREFIX_BYTE)]
	Prefix { received: u8 },
	#[error("invalid ID number {received:#04x} for the {command} command, expected {expected:#04x}")]
	Id {
		command: &'static str,
		expected: u8,
		received: u8,
	},
	#[error("ID number {0:#04x} is not a command the camera sends")]
	NotParsable(u8),
	#[error("parameter #{index} [{field}] must be specified for the {command} command")]
	MissingField {
		command: &'static str,
		index: u8,
		field: &'static str,
	},
	#[error("parameter #{index} must be {expected:#04x} for the {command} command but {received:#04x} was received")]
	FieldMismatch {
		command: &'static str,
		index: u8,
		expected: u8,
		received: u8,
	},
	#[error("parameter #{index} [{field}] of the {command} command cannot be {value:#x}")]
	OutOfRange {
		command: &'static str,
		index: u8,
		field: &'static str,
		value: u32,
	},
	#[error("parameter #{index} [{field}] does not apply to the selected color type of the {command} command")]
	ConflictingField {
		command: &'static str,
		index: u8,
		field: &'static str,
	},
}

impl FrameError {
	/// Wrong length, prefix or id: the bytes are not the asserted frame at all.
	pub fn is_framing(&self) -> bool {
		matches!(
			self,
			FrameError::Length(_) | FrameError::Prefix { .. } | FrameError::Id { .. } | FrameError::NotParsable(_)
		)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
	#[error("data package must be at least 4 bytes, received {0}")]
	TooShort(usize),
	#[error("expected {expected} package bytes, received {received}")]
	LengthMismatch { expected: usize, received: usize },
	#[error("high byte of verify code was {0:#04x}, expected 0x00")]
	ChecksumHighByte(u8),
	#[error("low byte of verify code was {received:#04x}, expected {expected:#04x}")]
	ChecksumMismatch { expected: u8, received: u8 },
	#[error("payload of {len} bytes at offset {offset} overflows a {capacity} byte image")]
	Overflow {
		offset: usize,
		len: usize,
		capacity: usize,
	},
	#[error("payload of {0} bytes does not fit a data package")]
	PayloadTooLarge(usize),
}

#[derive(Debug, Error)]
pub enum TransportError {
	#[error("timeout waiting for bytes")]
	Timeout,
	#[error("serial port EOF")]
	Closed,
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error(transparent)]
	Serial(#[from] serialport::Error),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
	#[error("no response to the {command} command")]
	NoResponse { command: &'static str },
	#[error("an ACK was not received after sending the {command} command, received [{}]", format_bytes(.bytes))]
	NotAcknowledged { command: &'static str, bytes: Vec<u8> },
	#[error("an ACK was received for command {received:#04x} instead of the {command} command ({expected:#04x})")]
	AckMismatch {
		command: &'static str,
		expected: u8,
		received: u8,
	},
	#[error("expected {expected} bytes after the {command} command, received {received}")]
	ShortRead {
		command: &'static str,
		expected: usize,
		received: usize,
	},
	#[error("camera announced {received:?} data while {expected:?} was requested")]
	UnexpectedDataType { expected: DataType, received: DataType },
	#[error("expected package {expected}, camera sent package {received}")]
	PacketOutOfOrder { expected: u16, received: u16 },
	#[error(transparent)]
	Frame(#[from] FrameError),
	#[error(transparent)]
	Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum HandshakeError {
	#[error("{context}, received [{}]", format_bytes(.bytes))]
	UnexpectedResponse { context: &'static str, bytes: Vec<u8> },
	#[error(transparent)]
	Frame(#[from] FrameError),
	#[error(transparent)]
	Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
	#[error("package size {0} is outside the accepted range of 64 to 512 bytes")]
	InvalidPacketSize(u16),
	#[error("image of {0} bytes needs more packages than the camera can number")]
	TooManyPackets(usize),
	#[error("package {index}: {source}")]
	Packet {
		index: u16,
		#[source]
		source: PacketError,
	},
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
}

#[derive(Debug, Error)]
pub enum CameraError {
	#[error("camera has not completed a handshake")]
	NotSynced,
	#[error(transparent)]
	Handshake(#[from] HandshakeError),
	#[error(transparent)]
	Capture(#[from] CaptureError),
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	#[error(transparent)]
	Transport(#[from] TransportError),
}
