use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
	Gray2Bit,
	Gray4Bit,
	Gray8Bit,
	Color12Bit,
	Color16Bit,
	Jpeg,
}

impl ColorType {
	pub fn code(self) -> u8 {
		match self {
			ColorType::Gray2Bit => 0x01,
			ColorType::Gray4Bit => 0x02,
			ColorType::Gray8Bit => 0x03,
			ColorType::Color12Bit => 0x05,
			ColorType::Color16Bit => 0x06,
			ColorType::Jpeg => 0x07,
		}
	}

	pub fn is_raw(self) -> bool {
		self != ColorType::Jpeg
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RawResolution {
	#[value(name = "80x60")]
	Raw80x60,
	#[value(name = "160x120")]
	Raw160x120,
}

impl RawResolution {
	pub fn code(self) -> u8 {
		match self {
			RawResolution::Raw80x60 => 0x01,
			RawResolution::Raw160x120 => 0x03,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum JpegResolution {
	#[value(name = "80x64")]
	Jpeg80x64,
	#[value(name = "160x128")]
	Jpeg160x128,
	#[value(name = "320x240")]
	Jpeg320x240,
	#[default]
	#[value(name = "640x480")]
	Jpeg640x480,
}

impl JpegResolution {
	pub fn code(self) -> u8 {
		match self {
			JpegResolution::Jpeg80x64 => 0x01,
			JpegResolution::Jpeg160x128 => 0x03,
			JpegResolution::Jpeg320x240 => 0x05,
			JpegResolution::Jpeg640x480 => 0x07,
		}
	}

	pub fn dimensions(self) -> (u16, u16) {
		match self {
			JpegResolution::Jpeg80x64 => (80, 64),
			JpegResolution::Jpeg160x128 => (160, 128),
			JpegResolution::Jpeg320x240 => (320, 240),
			JpegResolution::Jpeg640x480 => (640, 480),
		}
	}
}

impl fmt::Display for JpegResolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (w, h) = self.dimensions();
		write!(f, "{w}x{h}")
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotType {
	#[default]
	Compressed,
	Uncompressed,
}

impl SnapshotType {
	pub fn code(self) -> u8 {
		match self {
			SnapshotType::Compressed => 0x00,
			SnapshotType::Uncompressed => 0x01,
		}
	}
}

/// Picture requested with GET PICTURE. The device echoes the same code as
/// the data type of the DATA frame that announces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PictureType {
	#[default]
	Snapshot,
	Preview,
	JpegPreview,
}

impl PictureType {
	pub fn code(self) -> u8 {
		match self {
			PictureType::Snapshot => 0x01,
			PictureType::Preview => 0x02,
			PictureType::JpegPreview => 0x05,
		}
	}

	pub fn from_code(code: u8) -> Option<Self> {
		match code {
			0x01 => Some(PictureType::Snapshot),
			0x02 => Some(PictureType::Preview),
			0x05 => Some(PictureType::JpegPreview),
			_ => None,
		}
	}
}

pub type DataType = PictureType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetType {
	WholeSystem,
	StateMachine,
}

impl ResetType {
	pub fn code(self) -> u8 {
		match self {
			ResetType::WholeSystem => 0x00,
			ResetType::StateMachine => 0x01,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LightFrequency {
	#[value(name = "50hz")]
	Hz50,
	#[value(name = "60hz")]
	Hz60,
}

impl LightFrequency {
	pub fn code(self) -> u8 {
		match self {
			LightFrequency::Hz50 => 0x00,
			LightFrequency::Hz60 => 0x01,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BaudRate {
	#[value(name = "7200")]
	Baud7200,
	#[value(name = "9600")]
	Baud9600,
	#[value(name = "14400")]
	Baud14400,
	#[value(name = "19200")]
	Baud19200,
	#[value(name = "28800")]
	Baud28800,
	#[value(name = "38400")]
	Baud38400,
	#[value(name = "57600")]
	Baud57600,
	#[value(name = "115200")]
	Baud115200,
}

impl BaudRate {
	pub fn bps(self) -> u32 {
		match self {
			BaudRate::Baud7200 => 7200,
			BaudRate::Baud9600 => 9600,
			BaudRate::Baud14400 => 14400,
			BaudRate::Baud19200 => 19200,
			BaudRate::Baud28800 => 28800,
			BaudRate::Baud38400 => 38400,
			BaudRate::Baud57600 => 57600,
			BaudRate::Baud115200 => 115200,
		}
	}

	/// First and second clock divider bytes, in wire order.
	pub fn dividers(self) -> (u8, u8) {
		let first = match self {
			BaudRate::Baud7200 => 0xFF,
			BaudRate::Baud9600 => 0xBF,
			BaudRate::Baud14400 => 0x7F,
			BaudRate::Baud19200 => 0x5F,
			BaudRate::Baud28800 => 0x3F,
			BaudRate::Baud38400 => 0x2F,
			BaudRate::Baud57600 => 0x1F,
			BaudRate::Baud115200 => 0x0F,
		};
		(first, 0x01)
	}
}

impl fmt::Display for BaudRate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.bps())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn picture_codes_round_trip() {
		for p in [PictureType::Snapshot, PictureType::Preview, PictureType::JpegPreview] {
			assert_eq!(PictureType::from_code(p.code()), Some(p));
		}
		assert_eq!(PictureType::from_code(0x03), None);
	}

	#[test]
	fn baud_dividers() {
		assert_eq!(BaudRate::Baud115200.dividers(), (0x0F, 0x01));
		assert_eq!(BaudRate::Baud7200.dividers(), (0xFF, 0x01));
		assert_eq!(BaudRate::Baud57600.to_string(), "57600");
	}

	#[test]
	fn only_jpeg_is_compressed() {
		assert!(!ColorType::Jpeg.is_raw());
		assert!(ColorType::Gray8Bit.is_raw());
		assert_eq!(JpegResolution::default().to_string(), "640x480");
	}
}
