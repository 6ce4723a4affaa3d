use clap::{Parser, Subcommand};
use std::path::PathBuf;

use c328_cam::consts::{DEFAULT_BAUD_RATE, DEFAULT_PACKET_SIZE};
use c328_cam::types::{BaudRate, JpegResolution, LightFrequency};

#[derive(Parser)]
#[command(name = "c328-cam", about = "CLI for C328 serial JPEG camera modules", version)]
pub struct Cli {
	#[arg(short, long, help = "Serial port path (auto-detects if not specified)")]
	pub port: Option<String>,

	#[arg(short, long, default_value_t = DEFAULT_BAUD_RATE, help = "Host serial speed")]
	pub baud: u32,

	#[arg(long, default_value = "warn", help = "Log level (trace, debug, info, warn, error)")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	#[command(about = "Check whether a camera answers on the port")]
	Probe,
	#[command(about = "Take a JPEG snapshot and save it")]
	Capture {
		#[arg(short, long, default_value = "capture.jpg", help = "Output file")]
		output: PathBuf,

		#[arg(short, long, value_enum, default_value_t = JpegResolution::Jpeg640x480)]
		resolution: JpegResolution,

		#[arg(long, default_value_t = DEFAULT_PACKET_SIZE, help = "Transfer package size (64-512)")]
		packet_size: u16,

		#[arg(long, default_value_t = 0, help = "Frames to skip before the snapshot")]
		skip_frames: u16,

		#[arg(long, help = "Expect an empty closing package when the size divides evenly")]
		trailing_empty_packet: bool,
	},
	#[command(about = "Reset the camera")]
	Reset {
		#[arg(long, help = "Reset only the state machine instead of the whole system")]
		state_machine: bool,

		#[arg(long, help = "Reset immediately instead of after the current command")]
		immediate: bool,
	},
	#[command(about = "Power the camera down")]
	PowerOff,
	#[command(about = "Set the mains frequency used for flicker compensation")]
	LightFrequency {
		#[arg(value_enum)]
		frequency: LightFrequency,
	},
	#[command(about = "Change the camera's serial speed")]
	Baud {
		#[arg(value_enum)]
		rate: BaudRate,
	},
}
