use crate::consts::{FINAL_PACKAGE_ID, MAX_PACKET_SIZE, MIN_PACKET_SIZE, PACKET_OVERHEAD};
use crate::error::CaptureError;
use crate::types::LastPacketPolicy;

/// Sizes and offsets of the packages that carry an image of `total_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
	total_len: usize,
	packet_size: usize,
	count: usize,
	trailing_empty: bool,
}

impl TransferPlan {
	pub fn new(total_len: usize, packet_size: u16, policy: LastPacketPolicy) -> Result<Self, CaptureError> {
		if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&packet_size) {
			return Err(CaptureError::InvalidPacketSize(packet_size));
		}
		let packet_size = packet_size as usize;
		let capacity = packet_size - PACKET_OVERHEAD;

		let mut count = total_len.div_ceil(capacity);
		let trailing_empty =
			policy == LastPacketPolicy::TrailingEmpty && total_len > 0 && total_len % capacity == 0;
		if trailing_empty {
			count += 1;
		}
		if count > FINAL_PACKAGE_ID as usize {
			return Err(CaptureError::TooManyPackets(total_len));
		}

		Ok(Self {
			total_len,
			packet_size,
			count,
			trailing_empty,
		})
	}

	pub fn capacity(&self) -> usize {
		self.packet_size - PACKET_OVERHEAD
	}

	pub fn packet_count(&self) -> usize {
		self.count
	}

	pub fn total_len(&self) -> usize {
		self.total_len
	}

	/// Bytes on the wire for package `index`, header and verify code included.
	pub fn expected_len(&self, index: usize) -> usize {
		if index + 1 < self.count {
			return self.packet_size;
		}
		let rem = self.total_len % self.capacity();
		if rem == 0 && !self.trailing_empty {
			self.packet_size
		} else {
			rem + PACKET_OVERHEAD
		}
	}

	pub fn offset(&self, index: usize) -> usize {
		index * self.capacity()
	}
}
