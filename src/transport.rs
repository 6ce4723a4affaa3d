use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use anyhow::bail;
use tracing::trace;

use crate::error::TransportError;

/// Byte pipe to the camera. Every read is bounded by a timeout.
pub trait Transport {
	fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

	/// Returns up to `max_len` bytes received before `timeout` elapses.
	/// Fails with [`TransportError::Timeout`] only when nothing arrived.
	fn read_within(&mut self, timeout: Duration, max_len: usize) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
	fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
		(**self).write(bytes)
	}

	fn read_within(&mut self, timeout: Duration, max_len: usize) -> Result<Vec<u8>, TransportError> {
		(**self).read_within(timeout, max_len)
	}
}

pub struct SerialTransport {
	port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
	pub fn open(path: &str, baud_rate: u32) -> Result<Self, TransportError> {
		let port = serialport::new(path, baud_rate)
			.data_bits(serialport::DataBits::Eight)
			.stop_bits(serialport::StopBits::One)
			.parity(serialport::Parity::None)
			.timeout(Duration::from_millis(100))
			.open()?;
		Ok(Self { port })
	}

	pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), TransportError> {
		self.port.set_baud_rate(baud_rate)?;
		Ok(())
	}

	pub fn baud_rate(&self) -> Result<u32, TransportError> {
		Ok(self.port.baud_rate()?)
	}
}

impl Transport for SerialTransport {
	fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
		self.port.write_all(bytes)?;
		self.port.flush()?;
		Ok(())
	}

	fn read_within(&mut self, timeout: Duration, max_len: usize) -> Result<Vec<u8>, TransportError> {
		let mut buf = vec![0u8; max_len];
		let mut pos = 0;
		let deadline = Instant::now() + timeout;
		while pos < max_len {
			let now = Instant::now();
			if now >= deadline {
				break;
			}
			self.port.set_timeout(deadline - now)?;
			match self.port.read(&mut buf[pos..]) {
				Ok(0) => return Err(TransportError::Closed),
				Ok(n) => pos += n,
				Err(e) if e.kind() == ErrorKind::TimedOut => {}
				Err(e) => return Err(e.into()),
			}
		}
		if pos == 0 && max_len > 0 {
			return Err(TransportError::Timeout);
		}
		buf.truncate(pos);
		trace!(received = pos, wanted = max_len, "serial read");
		Ok(buf)
	}
}

/// Picks the only USB serial adapter attached to the host.
pub fn detect_port() -> anyhow::Result<String> {
	let ports = serialport::available_ports()?;
	let usb: Vec<_> = ports
		.iter()
		.filter(|p| matches!(p.port_type, serialport::SerialPortType::UsbPort(_)))
		.collect();
	match usb.as_slice() {
		[only] => Ok(only.port_name.clone()),
		[] => bail!("no USB serial adapter found. Is the camera plugged in?"),
		many => {
			let names: Vec<_> = many.iter().map(|p| p.port_name.as_str()).collect();
			bail!(
				"several serial adapters found ({}), pick one with --port",
				names.join(", ")
			)
		}
	}
}
