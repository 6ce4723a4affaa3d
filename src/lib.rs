//! Host-side driver for C328 serial JPEG camera modules.
//!
//! The camera speaks fixed 6-byte command frames and streams pictures in
//! checksummed packages, one per DATA ACK from the host.

pub mod capture;
pub mod consts;
pub mod device;
pub mod error;
pub mod handshake;
pub mod protocol;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use capture::{capture_picture, capture_picture_with};
pub use device::Camera;
pub use error::{
	CameraError, CaptureError, FrameError, HandshakeError, PacketError, ProtocolError, TransportError,
};
pub use handshake::{handshake, Presence};
pub use transport::{SerialTransport, Transport};
