//! Test doubles for [`Transport`].

use std::collections::VecDeque;
use std::time::Duration;

use crate::consts::*;
use crate::error::TransportError;
use crate::protocol::commands::{encode, Ack, Command, Data};
use crate::protocol::packet::encode_packet;
use crate::transport::Transport;
use crate::types::DataType;

pub enum Reply {
	Bytes(Vec<u8>),
	Silence,
}

/// Answers each read with the next scripted reply, ignoring what was written.
pub struct ScriptedTransport {
	replies: VecDeque<Reply>,
	pub written: Vec<Vec<u8>>,
	pub reads: usize,
}

impl ScriptedTransport {
	pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
		Self {
			replies: replies.into_iter().collect(),
			written: Vec::new(),
			reads: 0,
		}
	}
}

impl Transport for ScriptedTransport {
	fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
		self.written.push(bytes.to_vec());
		Ok(())
	}

	fn read_within(&mut self, _timeout: Duration, max_len: usize) -> Result<Vec<u8>, TransportError> {
		self.reads += 1;
		match self.replies.pop_front() {
			Some(Reply::Bytes(mut bytes)) => {
				if bytes.len() > max_len {
					let rest = bytes.split_off(max_len);
					self.replies.push_front(Reply::Bytes(rest));
				}
				Ok(bytes)
			}
			Some(Reply::Silence) | None => Err(TransportError::Timeout),
		}
	}
}

/// Lets `writes_left` writes through to `inner`, then fails every write as if
/// the port had closed.
pub struct BreaksAfter<T> {
	pub inner: T,
	pub writes_left: usize,
}

impl<T> BreaksAfter<T> {
	pub fn new(inner: T, writes_left: usize) -> Self {
		Self { inner, writes_left }
	}
}

impl<T: Transport> Transport for BreaksAfter<T> {
	fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
		if self.writes_left == 0 {
			return Err(TransportError::Closed);
		}
		self.writes_left -= 1;
		self.inner.write(bytes)
	}

	fn read_within(&mut self, timeout: Duration, max_len: usize) -> Result<Vec<u8>, TransportError> {
		self.inner.read_within(timeout, max_len)
	}
}

/// Plays the camera side of the protocol against a fixed image.
pub struct SimulatedCamera {
	pub image: Vec<u8>,
	/// Answer the nth SYNC of the session; `None` never answers.
	pub answer_sync: Option<usize>,
	pub corrupt_package: Option<u16>,
	pub wrong_package_id: Option<u16>,
	pub nack_command: Option<u8>,
	pub written: Vec<Vec<u8>>,
	pub syncs_seen: usize,
	pub synced: bool,
	pub finished: bool,
	pub package_size: usize,
	outbox: VecDeque<u8>,
	counter: u8,
}

impl SimulatedCamera {
	pub fn new(image: Vec<u8>) -> Self {
		Self {
			image,
			answer_sync: Some(3),
			corrupt_package: None,
			wrong_package_id: None,
			nack_command: None,
			written: Vec::new(),
			syncs_seen: 0,
			synced: false,
			finished: false,
			package_size: 64,
			outbox: VecDeque::new(),
			counter: 0,
		}
	}

	pub fn frames_with_id(&self, id: u8) -> usize {
		self.written.iter().filter(|f| f.get(1) == Some(&id)).count()
	}

	fn push_frame(&mut self, command: Command) {
		let frame = encode(&command).expect("simulated frame");
		self.outbox.extend(frame);
	}

	fn ack(&mut self, id: u8) {
		self.counter = self.counter.wrapping_add(1);
		if self.nack_command == Some(id) {
			self.outbox
				.extend([PREFIX_BYTE, CMD_NACK, 0x00, self.counter, 0x0B, 0x00]);
			return;
		}
		self.push_frame(Command::Ack(Ack::new(id, self.counter)));
	}

	fn send_package(&mut self, index: u16) {
		let capacity = self.package_size - PACKET_OVERHEAD;
		let start = (index as usize * capacity).min(self.image.len());
		let end = (start + capacity).min(self.image.len());
		let id = if self.wrong_package_id == Some(index) {
			index + 1
		} else {
			index
		};
		let mut bytes = encode_packet(id, &self.image[start..end]).expect("simulated package");
		if self.corrupt_package == Some(index) {
			let low = bytes.len() - 2;
			bytes[low] = bytes[low].wrapping_add(1);
		}
		self.outbox.extend(bytes);
	}
}

impl Transport for SimulatedCamera {
	fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
		self.written.push(bytes.to_vec());
		assert_eq!(bytes.len(), COMMAND_SIZE, "host sent a non-frame");
		assert_eq!(bytes[0], PREFIX_BYTE);

		match bytes[1] {
			CMD_SYNC => {
				self.syncs_seen += 1;
				if self.answer_sync == Some(self.syncs_seen) {
					self.ack(CMD_SYNC);
					self.outbox.extend(SYNC_FRAME);
				}
			}
			CMD_ACK if bytes[2] == CMD_SYNC => self.synced = true,
			CMD_ACK => {
				let id = u16::from_le_bytes([bytes[4], bytes[5]]);
				if id == FINAL_PACKAGE_ID {
					self.finished = true;
				} else {
					self.send_package(id);
				}
			}
			CMD_SET_PACKAGE_SIZE => {
				self.package_size = u16::from_le_bytes([bytes[3], bytes[4]]) as usize;
				self.ack(CMD_SET_PACKAGE_SIZE);
			}
			CMD_GET_PICTURE => {
				self.ack(CMD_GET_PICTURE);
				if self.nack_command != Some(CMD_GET_PICTURE) {
					let length = self.image.len() as u32;
					self.push_frame(Command::Data(Data::new(DataType::Snapshot, length)));
				}
			}
			id => self.ack(id),
		}
		Ok(())
	}

	fn read_within(&mut self, _timeout: Duration, max_len: usize) -> Result<Vec<u8>, TransportError> {
		if self.outbox.is_empty() {
			return Err(TransportError::Timeout);
		}
		let n = max_len.min(self.outbox.len());
		Ok(self.outbox.drain(..n).collect())
	}
}
