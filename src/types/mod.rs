mod config;
mod options;

pub use config::{CaptureRequest, LastPacketPolicy, Timing};
pub use options::{
	BaudRate, ColorType, DataType, JpegResolution, LightFrequency, PictureType, RawResolution,
	ResetType, SnapshotType,
};
