use tracing::{debug, info};

use crate::consts::COMMAND_SIZE;
use crate::error::{CaptureError, ProtocolError};
use crate::protocol::commands::{decode_data, Command, DataAck, GetPicture, Initial, SetPackageSize, Snapshot};
use crate::protocol::exchange::{read_exact_within, send_command, send_with_ack};
use crate::protocol::packet::DataPacket;
use crate::protocol::transfer::TransferPlan;
use crate::transport::Transport;
use crate::types::{CaptureRequest, JpegResolution, SnapshotType, Timing};

/// Takes a compressed snapshot and returns the JPEG bytes.
pub fn capture_picture<T: Transport + ?Sized>(
	transport: &mut T,
	resolution: JpegResolution,
	packet_size: u16,
) -> Result<Vec<u8>, CaptureError> {
	let request = CaptureRequest::new(resolution, packet_size);
	capture_picture_with(transport, &request, &Timing::default(), |_, _| {})
}

/// Like [`capture_picture`], reporting `(received, total)` bytes after each package.
pub fn capture_picture_with<T, F>(
	transport: &mut T,
	request: &CaptureRequest,
	timing: &Timing,
	mut progress: F,
) -> Result<Vec<u8>, CaptureError>
where
	T: Transport + ?Sized,
	F: FnMut(usize, usize),
{
	// Reject a bad size before the camera is reconfigured.
	TransferPlan::new(0, request.packet_size, request.last_packet)?;
	let timeout = timing.response_timeout;

	send_with_ack(transport, &Command::Initial(Initial::jpeg(request.resolution)), timeout)?;
	send_with_ack(
		transport,
		&Command::SetPackageSize(SetPackageSize::new(request.packet_size)),
		timeout,
	)?;
	send_with_ack(
		transport,
		&Command::Snapshot(Snapshot::new(SnapshotType::Compressed, request.skip_frames)),
		timeout,
	)?;
	send_with_ack(transport, &Command::GetPicture(GetPicture::new(request.picture)), timeout)?;

	let header = read_exact_within(transport, timeout, COMMAND_SIZE, "GET PICTURE")?;
	let data = decode_data(&header).map_err(ProtocolError::from)?;
	if let Some(kind) = data.kind.filter(|k| *k != request.picture) {
		return Err(ProtocolError::UnexpectedDataType {
			expected: request.picture,
			received: kind,
		}
		.into());
	}
	let total = data.length.unwrap_or_default() as usize;

	let plan = TransferPlan::new(total, request.packet_size, request.last_packet)?;
	info!(
		bytes = total,
		packages = plan.packet_count(),
		resolution = %request.resolution,
		"receiving picture"
	);

	let mut image = vec![0u8; total];
	for index in 0..plan.packet_count() {
		// Bounded by TransferPlan, below the final package id.
		let id = index as u16;
		send_command(transport, &Command::DataAck(DataAck::Package(id)))?;
		let bytes = read_exact_within(transport, timeout, plan.expected_len(index), "DATA ACK")?;

		let packet = DataPacket::decode(&bytes).map_err(|source| CaptureError::Packet { index: id, source })?;
		if packet.id() != id {
			return Err(ProtocolError::PacketOutOfOrder {
				expected: id,
				received: packet.id(),
			}
			.into());
		}
		packet
			.copy_into(&mut image, plan.offset(index))
			.map_err(|source| CaptureError::Packet { index: id, source })?;

		let received = (plan.offset(index) + packet.payload().len()).min(total);
		debug!(package = id, received, total, "package received");
		progress(received, total);
	}

	send_command(transport, &Command::DataAck(DataAck::Final))?;
	Ok(image)
}
