use crate::consts::*;
use crate::error::FrameError;
use crate::types::{
	BaudRate, ColorType, DataType, JpegResolution, LightFrequency, PictureType, RawResolution,
	ResetType, SnapshotType,
};

pub type Frame = [u8; COMMAND_SIZE];
type Params = [u8; PARAMETER_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	Sync,
	Ack(Ack),
	Nack(Nack),
	Initial(Initial),
	SetPackageSize(SetPackageSize),
	Snapshot(Snapshot),
	GetPicture(GetPicture),
	Data(Data),
	DataAck(DataAck),
	Reset(Reset),
	PowerOff,
	SetBaudRate(SetBaudRate),
	LightFrequency(SetLightFrequency),
}

impl Command {
	pub fn id(&self) -> u8 {
		match self {
			Command::Sync => CMD_SYNC,
			Command::Ack(_) | Command::DataAck(_) => CMD_ACK,
			Command::Nack(_) => CMD_NACK,
			Command::Initial(_) => CMD_INITIAL,
			Command::SetPackageSize(_) => CMD_SET_PACKAGE_SIZE,
			Command::Snapshot(_) => CMD_SNAPSHOT,
			Command::GetPicture(_) => CMD_GET_PICTURE,
			Command::Data(_) => CMD_DATA,
			Command::Reset(_) => CMD_RESET,
			Command::PowerOff => CMD_POWER_OFF,
			Command::SetBaudRate(_) => CMD_SET_BAUD_RATE,
			Command::LightFrequency(_) => CMD_LIGHT_FREQUENCY,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Command::Sync => "SYNC",
			Command::Ack(_) => "ACK",
			Command::Nack(_) => "NACK",
			Command::Initial(_) => "INITIAL",
			Command::SetPackageSize(_) => "SET PACKAGE SIZE",
			Command::Snapshot(_) => "SNAPSHOT",
			Command::GetPicture(_) => "GET PICTURE",
			Command::Data(_) => "DATA",
			Command::DataAck(_) => "DATA ACK",
			Command::Reset(_) => "RESET",
			Command::PowerOff => "POWER OFF",
			Command::SetBaudRate(_) => "SET BAUD RATE",
			Command::LightFrequency(_) => "LIGHT FREQUENCY",
		}
	}

	fn params(&self) -> Result<Params, FrameError> {
		match self {
			Command::Sync | Command::PowerOff => Ok([0; PARAMETER_SIZE]),
			Command::Ack(c) => c.params(),
			Command::Nack(c) => c.params(),
			Command::Initial(c) => c.params(),
			Command::SetPackageSize(c) => c.params(),
			Command::Snapshot(c) => c.params(),
			Command::GetPicture(c) => c.params(),
			Command::Data(c) => c.params(),
			Command::DataAck(c) => c.params(),
			Command::Reset(c) => c.params(),
			Command::SetBaudRate(c) => c.params(),
			Command::LightFrequency(c) => c.params(),
		}
	}
}

pub fn encode(command: &Command) -> Result<Frame, FrameError> {
	let [p1, p2, p3, p4] = command.params()?;
	Ok([PREFIX_BYTE, command.id(), p1, p2, p3, p4])
}

/// Decodes any frame the camera can send, dispatching on the id byte.
pub fn decode(bytes: &[u8]) -> Result<Command, FrameError> {
	check_length_and_prefix(bytes)?;
	match bytes[1] {
		CMD_SYNC => decode_sync(bytes).map(|()| Command::Sync),
		CMD_ACK => decode_ack(bytes).map(Command::Ack),
		CMD_NACK => decode_nack(bytes).map(Command::Nack),
		CMD_DATA => decode_data(bytes).map(Command::Data),
		other => Err(FrameError::NotParsable(other)),
	}
}

pub fn decode_sync(bytes: &[u8]) -> Result<(), FrameError> {
	let params = parse_params(bytes, CMD_SYNC, "SYNC")?;
	for (i, &b) in params.iter().enumerate() {
		require(b, 0x00, "SYNC", i as u8 + 1)?;
	}
	Ok(())
}

pub fn decode_ack(bytes: &[u8]) -> Result<Ack, FrameError> {
	let [p1, p2, p3, p4] = parse_params(bytes, CMD_ACK, "ACK")?;
	Ok(Ack {
		command_id: Some(p1),
		counter: Some(p2),
		package_id: u16::from_le_bytes([p3, p4]),
	})
}

pub fn decode_nack(bytes: &[u8]) -> Result<Nack, FrameError> {
	let [p1, p2, p3, p4] = parse_params(bytes, CMD_NACK, "NACK")?;
	require(p1, 0x00, "NACK", 1)?;
	require(p4, 0x00, "NACK", 4)?;
	Ok(Nack {
		counter: Some(p2),
		error_code: Some(p3),
	})
}

pub fn decode_data(bytes: &[u8]) -> Result<Data, FrameError> {
	let [p1, p2, p3, p4] = parse_params(bytes, CMD_DATA, "DATA")?;
	let kind = DataType::from_code(p1).ok_or(FrameError::OutOfRange {
		command: "DATA",
		index: 1,
		field: "data type",
		value: p1 as u32,
	})?;
	Ok(Data {
		kind: Some(kind),
		length: Some(u32::from_le_bytes([p2, p3, p4, 0])),
	})
}

fn check_length_and_prefix(bytes: &[u8]) -> Result<(), FrameError> {
	if bytes.len() != COMMAND_SIZE {
		return Err(FrameError::Length(bytes.len()));
	}
	if bytes[0] != PREFIX_BYTE {
		return Err(FrameError::Prefix { received: bytes[0] });
	}
	Ok(())
}

fn parse_params(bytes: &[u8], id: u8, command: &'static str) -> Result<Params, FrameError> {
	check_length_and_prefix(bytes)?;
	if bytes[1] != id {
		return Err(FrameError::Id {
			command,
			expected: id,
			received: bytes[1],
		});
	}
	Ok([bytes[2], bytes[3], bytes[4], bytes[5]])
}

fn require(received: u8, expected: u8, command: &'static str, index: u8) -> Result<(), FrameError> {
	if received != expected {
		return Err(FrameError::FieldMismatch {
			command,
			index,
			expected,
			received,
		});
	}
	Ok(())
}

fn missing(command: &'static str, index: u8, field: &'static str) -> FrameError {
	FrameError::MissingField {
		command,
		index,
		field,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack {
	pub command_id: Option<u8>,
	/// Debug counter, not used by the protocol.
	pub counter: Option<u8>,
	pub package_id: u16,
}

impl Ack {
	pub fn new(command_id: u8, counter: u8) -> Self {
		Self {
			command_id: Some(command_id),
			counter: Some(counter),
			package_id: 0,
		}
	}

	/// Acknowledges an ACK received from the camera by echoing its fields.
	pub fn relay(received: &Ack) -> Self {
		Self {
			command_id: received.command_id,
			counter: received.counter,
			package_id: 0,
		}
	}

	pub fn acknowledges(&self, command: &Command) -> bool {
		self.command_id == Some(command.id())
	}

	fn params(&self) -> Result<Params, FrameError> {
		let id = self.command_id.ok_or(missing("ACK", 1, "command ID"))?;
		let counter = self.counter.ok_or(missing("ACK", 2, "ACK counter"))?;
		let [lo, hi] = self.package_id.to_le_bytes();
		Ok([id, counter, lo, hi])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nack {
	pub counter: Option<u8>,
	pub error_code: Option<u8>,
}

impl Nack {
	fn params(&self) -> Result<Params, FrameError> {
		let counter = self.counter.ok_or(missing("NACK", 2, "NACK counter"))?;
		let code = self.error_code.ok_or(missing("NACK", 3, "error number"))?;
		Ok([0x00, counter, code, 0x00])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Initial {
	pub color: Option<ColorType>,
	pub raw_resolution: Option<RawResolution>,
	pub jpeg_resolution: Option<JpegResolution>,
}

impl Initial {
	pub fn jpeg(resolution: JpegResolution) -> Self {
		Self {
			color: Some(ColorType::Jpeg),
			raw_resolution: None,
			jpeg_resolution: Some(resolution),
		}
	}

	pub fn raw(color: ColorType, resolution: RawResolution) -> Self {
		Self {
			color: Some(color),
			raw_resolution: Some(resolution),
			jpeg_resolution: None,
		}
	}

	fn params(&self) -> Result<Params, FrameError> {
		let color = self.color.ok_or(missing("INITIAL", 2, "color type"))?;
		let mut params = [0x00, color.code(), 0x00, 0x00];
		if color.is_raw() {
			if self.jpeg_resolution.is_some() {
				return Err(FrameError::ConflictingField {
					command: "INITIAL",
					index: 4,
					field: "JPEG resolution",
				});
			}
			let res = self.raw_resolution.ok_or(missing("INITIAL", 3, "RAW resolution"))?;
			params[2] = res.code();
		} else {
			if self.raw_resolution.is_some() {
				return Err(FrameError::ConflictingField {
					command: "INITIAL",
					index: 3,
					field: "RAW resolution",
				});
			}
			let res = self.jpeg_resolution.ok_or(missing("INITIAL", 4, "JPEG resolution"))?;
			params[3] = res.code();
		}
		Ok(params)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetPackageSize {
	pub size: Option<u16>,
}

impl SetPackageSize {
	pub fn new(size: u16) -> Self {
		Self { size: Some(size) }
	}

	fn params(&self) -> Result<Params, FrameError> {
		let size = self.size.ok_or(missing("SET PACKAGE SIZE", 2, "package size"))?;
		let [lo, hi] = size.to_le_bytes();
		Ok([PACKAGE_SIZE_MARKER, lo, hi, 0x00])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
	pub kind: Option<SnapshotType>,
	pub skip_frames: u16,
}

impl Snapshot {
	pub fn new(kind: SnapshotType, skip_frames: u16) -> Self {
		Self {
			kind: Some(kind),
			skip_frames,
		}
	}

	fn params(&self) -> Result<Params, FrameError> {
		let kind = self.kind.ok_or(missing("SNAPSHOT", 1, "snapshot type"))?;
		let [lo, hi] = self.skip_frames.to_le_bytes();
		Ok([kind.code(), lo, hi, 0x00])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetPicture {
	pub kind: Option<PictureType>,
}

impl GetPicture {
	pub fn new(kind: PictureType) -> Self {
		Self { kind: Some(kind) }
	}

	fn params(&self) -> Result<Params, FrameError> {
		let kind = self.kind.ok_or(missing("GET PICTURE", 1, "picture type"))?;
		Ok([kind.code(), 0x00, 0x00, 0x00])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Data {
	pub kind: Option<DataType>,
	/// 24-bit byte count of the image that follows.
	pub length: Option<u32>,
}

impl Data {
	pub fn new(kind: DataType, length: u32) -> Self {
		Self {
			kind: Some(kind),
			length: Some(length),
		}
	}

	fn params(&self) -> Result<Params, FrameError> {
		let kind = self.kind.ok_or(missing("DATA", 1, "data type"))?;
		let length = self.length.ok_or(missing("DATA", 2, "length"))?;
		if length > MAX_DATA_LENGTH {
			return Err(FrameError::OutOfRange {
				command: "DATA",
				index: 2,
				field: "length",
				value: length,
			});
		}
		let [b0, b1, b2, _] = length.to_le_bytes();
		Ok([kind.code(), b0, b1, b2])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAck {
	/// Ready for the package with this index.
	Package(u16),
	/// Sent once after the last package.
	Final,
}

impl DataAck {
	fn params(&self) -> Result<Params, FrameError> {
		let id = match *self {
			DataAck::Package(FINAL_PACKAGE_ID) => {
				return Err(FrameError::OutOfRange {
					command: "DATA ACK",
					index: 3,
					field: "package ID",
					value: FINAL_PACKAGE_ID as u32,
				})
			}
			DataAck::Package(id) => id,
			DataAck::Final => FINAL_PACKAGE_ID,
		};
		let [lo, hi] = id.to_le_bytes();
		Ok([0x00, 0x00, lo, hi])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reset {
	pub kind: Option<ResetType>,
	pub immediate: bool,
}

impl Reset {
	pub fn new(kind: ResetType, immediate: bool) -> Self {
		Self {
			kind: Some(kind),
			immediate,
		}
	}

	fn params(&self) -> Result<Params, FrameError> {
		let kind = self.kind.ok_or(missing("RESET", 1, "reset type"))?;
		let flag = if self.immediate { RESET_IMMEDIATE_FLAG } else { 0x00 };
		Ok([kind.code(), 0x00, 0x00, flag])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetBaudRate {
	pub rate: Option<BaudRate>,
}

impl SetBaudRate {
	pub fn new(rate: BaudRate) -> Self {
		Self { rate: Some(rate) }
	}

	fn params(&self) -> Result<Params, FrameError> {
		let rate = self.rate.ok_or(missing("SET BAUD RATE", 1, "baud rate"))?;
		let (first, second) = rate.dividers();
		Ok([first, second, 0x00, 0x00])
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetLightFrequency {
	pub frequency: Option<LightFrequency>,
}

impl SetLightFrequency {
	pub fn new(frequency: LightFrequency) -> Self {
		Self {
			frequency: Some(frequency),
		}
	}

	fn params(&self) -> Result<Params, FrameError> {
		let frequency = self.frequency.ok_or(missing("LIGHT FREQUENCY", 1, "light frequency"))?;
		Ok([frequency.code(), 0x00, 0x00, 0x00])
	}
}
