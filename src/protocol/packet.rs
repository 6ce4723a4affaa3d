use crate::consts::{PACKET_HEADER_SIZE, PACKET_OVERHEAD};
use crate::error::PacketError;

/// One package of image data as sent by the camera:
/// `[id: u16 LE][size: u16 LE][payload: size bytes][verify code: u16 LE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPacket<'a> {
	id: u16,
	payload: &'a [u8],
}

impl<'a> DataPacket<'a> {
	pub fn decode(bytes: &'a [u8]) -> Result<Self, PacketError> {
		if bytes.len() < PACKET_HEADER_SIZE {
			return Err(PacketError::TooShort(bytes.len()));
		}
		let id = u16::from_le_bytes([bytes[0], bytes[1]]);
		let size = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
		let total = size + PACKET_OVERHEAD;
		if bytes.len() != total {
			return Err(PacketError::LengthMismatch {
				expected: total,
				received: bytes.len(),
			});
		}

		let code_at = total - 2;
		if bytes[code_at + 1] != 0 {
			return Err(PacketError::ChecksumHighByte(bytes[code_at + 1]));
		}
		let expected = checksum(&bytes[..code_at]);
		if bytes[code_at] != expected {
			return Err(PacketError::ChecksumMismatch {
				expected,
				received: bytes[code_at],
			});
		}

		Ok(DataPacket {
			id,
			payload: &bytes[PACKET_HEADER_SIZE..code_at],
		})
	}

	pub fn id(&self) -> u16 {
		self.id
	}

	pub fn payload(&self) -> &'a [u8] {
		self.payload
	}

	pub fn copy_into(&self, image: &mut [u8], offset: usize) -> Result<(), PacketError> {
		let end = offset + self.payload.len();
		if end > image.len() {
			return Err(PacketError::Overflow {
				offset,
				len: self.payload.len(),
				capacity: image.len(),
			});
		}
		image[offset..end].copy_from_slice(self.payload);
		Ok(())
	}
}

/// Builds a package the way the camera does.
pub fn encode_packet(id: u16, payload: &[u8]) -> Result<Vec<u8>, PacketError> {
	let size = u16::try_from(payload.len()).map_err(|_| PacketError::PayloadTooLarge(payload.len()))?;
	let mut buf = Vec::with_capacity(payload.len() + PACKET_OVERHEAD);
	buf.extend_from_slice(&id.to_le_bytes());
	buf.extend_from_slice(&size.to_le_bytes());
	buf.extend_from_slice(payload);
	let code = checksum(&buf);
	buf.extend_from_slice(&[code, 0x00]);
	Ok(buf)
}

pub fn checksum(bytes: &[u8]) -> u8 {
	bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
