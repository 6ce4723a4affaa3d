use std::time::Duration;

use tracing::{debug, warn};

use crate::consts::COMMAND_SIZE;
use crate::error::{ProtocolError, TransportError};
use crate::protocol::commands::{decode_ack, decode_nack, encode, Command};
use crate::protocol::format_bytes;
use crate::transport::Transport;

pub fn send_command<T: Transport + ?Sized>(transport: &mut T, command: &Command) -> Result<(), ProtocolError> {
	let frame = encode(command)?;
	debug!(command = command.name(), frame = %format_bytes(&frame), "send");
	transport.write(&frame)?;
	Ok(())
}

/// Waits for exactly `len` bytes following `command`. A timeout means the
/// camera never answered.
pub fn read_exact_within<T: Transport + ?Sized>(
	transport: &mut T,
	timeout: Duration,
	len: usize,
	command: &'static str,
) -> Result<Vec<u8>, ProtocolError> {
	let bytes = match transport.read_within(timeout, len) {
		Ok(bytes) => bytes,
		Err(TransportError::Timeout) => return Err(ProtocolError::NoResponse { command }),
		Err(e) => return Err(e.into()),
	};
	if bytes.len() != len {
		return Err(ProtocolError::ShortRead {
			command,
			expected: len,
			received: bytes.len(),
		});
	}
	Ok(bytes)
}

/// Sends `command` and requires an ACK naming it within `timeout`.
pub fn send_with_ack<T: Transport + ?Sized>(
	transport: &mut T,
	command: &Command,
	timeout: Duration,
) -> Result<(), ProtocolError> {
	send_command(transport, command)?;

	let name = command.name();
	let bytes = match transport.read_within(timeout, COMMAND_SIZE) {
		Ok(bytes) => bytes,
		Err(TransportError::Timeout) => return Err(ProtocolError::NoResponse { command: name }),
		Err(e) => return Err(e.into()),
	};
	debug!(command = name, frame = %format_bytes(&bytes), "recv");

	let ack = match decode_ack(&bytes) {
		Ok(ack) => ack,
		Err(_) => {
			match decode_nack(&bytes) {
				Ok(nack) => warn!(command = name, error_code = ?nack.error_code, "camera sent NACK"),
				Err(e) if !e.is_framing() => warn!(command = name, error = %e, "camera sent malformed NACK"),
				Err(_) => {}
			}
			return Err(ProtocolError::NotAcknowledged { command: name, bytes });
		}
	};
	if !ack.acknowledges(command) {
		return Err(ProtocolError::AckMismatch {
			command: name,
			expected: command.id(),
			received: ack.command_id.unwrap_or_default(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::consts::SYNC_FRAME;
	use crate::testing::{Reply, ScriptedTransport};

	const TIMEOUT: Duration = Duration::from_millis(10);

	#[test]
	fn accepts_matching_ack() {
		let mut t = ScriptedTransport::new([Reply::Bytes(vec![0xAA, 0x0E, 0x09, 0x01, 0x00, 0x00])]);
		send_with_ack(&mut t, &Command::PowerOff, TIMEOUT).unwrap();
		assert_eq!(t.written, vec![vec![0xAA, 0x09, 0x00, 0x00, 0x00, 0x00]]);
	}

	#[test]
	fn ack_for_other_command_is_mismatch() {
		let mut t = ScriptedTransport::new([Reply::Bytes(vec![0xAA, 0x0E, 0x05, 0x01, 0x00, 0x00])]);
		let err = send_with_ack(&mut t, &Command::PowerOff, TIMEOUT).unwrap_err();
		assert!(matches!(
			err,
			ProtocolError::AckMismatch {
				command: "POWER OFF",
				expected: 0x09,
				received: 0x05
			}
		));
	}

	#[test]
	fn nack_and_garbage_are_not_acknowledged() {
		let replies = [
			vec![0xAA, 0x0F, 0x00, 0x01, 0x0B, 0x00],
			vec![0xAA, 0x0F, 0x07, 0x01, 0x0B, 0x00],
			SYNC_FRAME.to_vec(),
			vec![0x01, 0x02],
		];
		for reply in replies {
			let mut t = ScriptedTransport::new([Reply::Bytes(reply.clone())]);
			let err = send_with_ack(&mut t, &Command::PowerOff, TIMEOUT).unwrap_err();
			assert!(matches!(err, ProtocolError::NotAcknowledged { bytes, .. } if bytes == reply));
		}
	}

	#[test]
	fn silence_is_no_response() {
		let mut t = ScriptedTransport::new([]);
		let err = send_with_ack(&mut t, &Command::PowerOff, TIMEOUT).unwrap_err();
		assert!(matches!(err, ProtocolError::NoResponse { command: "POWER OFF" }));
	}

	#[test]
	fn short_read_is_reported() {
		let mut t = ScriptedTransport::new([Reply::Bytes(vec![0u8; 100])]);
		let err = read_exact_within(&mut t, TIMEOUT, 512, "DATA ACK").unwrap_err();
		assert!(matches!(
			err,
			ProtocolError::ShortRead {
				expected: 512,
				received: 100,
				..
			}
		));
	}
}
