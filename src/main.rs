mod cli;

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use c328_cam::transport::detect_port;
use c328_cam::types::{CaptureRequest, LastPacketPolicy, ResetType};
use c328_cam::{Camera, Presence, SerialTransport};
use cli::{Cli, Commands};

fn main() -> Result<()> {
	let cli = Cli::parse();

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();

	let port = match &cli.port {
		Some(p) => p.clone(),
		None => detect_port()?,
	};

	let mut cam = Camera::open(&port, cli.baud)?;
	let presence = cam.handshake()?;
	if presence == Presence::NotPresent && !matches!(cli.command, Commands::Probe) {
		bail!("no camera answered on {port}. Is it powered and wired to the right baud rate?");
	}

	match cli.command {
		Commands::Probe => cmd_probe(&cam, &port, presence),
		Commands::Capture {
			output,
			resolution,
			packet_size,
			skip_frames,
			trailing_empty_packet,
		} => {
			let request = CaptureRequest {
				resolution,
				packet_size,
				skip_frames,
				last_packet: if trailing_empty_packet {
					LastPacketPolicy::TrailingEmpty
				} else {
					LastPacketPolicy::FullPacket
				},
				..CaptureRequest::default()
			};
			cmd_capture(&mut cam, &request, &output)
		}
		Commands::Reset {
			state_machine,
			immediate,
		} => {
			let kind = if state_machine {
				ResetType::StateMachine
			} else {
				ResetType::WholeSystem
			};
			cam.reset(kind, immediate)?;
			println!("Reset sent.");
			Ok(())
		}
		Commands::PowerOff => {
			cam.power_off()?;
			println!("Camera powered off.");
			Ok(())
		}
		Commands::LightFrequency { frequency } => {
			cam.set_light_frequency(frequency)?;
			println!("Light frequency set to {frequency:?}.");
			Ok(())
		}
		Commands::Baud { rate } => {
			cam.set_baud_rate(rate)?;
			println!("Baud rate set to {rate}. Pass --baud {rate} from now on.");
			Ok(())
		}
	}
}

fn cmd_probe(cam: &Camera<SerialTransport>, port: &str, presence: Presence) -> Result<()> {
	let baud = cam.baud_rate()?;
	match presence {
		Presence::Present => println!("Camera present on {port} at {baud} baud"),
		Presence::NotPresent => println!("No camera on {port} at {baud} baud"),
	}
	Ok(())
}

fn cmd_capture(cam: &mut Camera<SerialTransport>, request: &CaptureRequest, output: &Path) -> Result<()> {
	eprintln!("Capturing {} snapshot...", request.resolution);

	let pb = ProgressBar::new(0);
	pb.set_style(
		ProgressStyle::default_bar()
			.template("{spinner:.cyan} [{bar:40.cyan/dim}] {bytes}/{total_bytes} ({eta})")?
			.progress_chars("=> "),
	);

	let image = cam.capture(request, |received, total| {
		pb.set_length(total as u64);
		pb.set_position(received as u64);
	})?;
	pb.finish_and_clear();

	if image.is_empty() {
		bail!("camera returned an empty picture");
	}
	std::fs::write(output, &image)?;
	println!(
		"Saved {} ({} bytes, crc32 {:#010x})",
		output.display(),
		image.len(),
		crc32fast::hash(&image)
	);
	Ok(())
}
