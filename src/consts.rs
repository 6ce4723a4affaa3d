use std::time::Duration;

pub const COMMAND_SIZE: usize = 6;
pub const PARAMETER_SIZE: usize = 4;
pub const PREFIX_BYTE: u8 = 0xAA;

pub const CMD_INITIAL: u8 = 0x01;
pub const CMD_GET_PICTURE: u8 = 0x04;
pub const CMD_SNAPSHOT: u8 = 0x05;
pub const CMD_SET_PACKAGE_SIZE: u8 = 0x06;
pub const CMD_SET_BAUD_RATE: u8 = 0x07;
pub const CMD_RESET: u8 = 0x08;
pub const CMD_POWER_OFF: u8 = 0x09;
pub const CMD_DATA: u8 = 0x0A;
pub const CMD_SYNC: u8 = 0x0D;
pub const CMD_ACK: u8 = 0x0E;
pub const CMD_NACK: u8 = 0x0F;
pub const CMD_LIGHT_FREQUENCY: u8 = 0x13;

pub const SYNC_FRAME: [u8; COMMAND_SIZE] = [PREFIX_BYTE, CMD_SYNC, 0x00, 0x00, 0x00, 0x00];

pub const PACKAGE_SIZE_MARKER: u8 = 0x08;
pub const RESET_IMMEDIATE_FLAG: u8 = 0xFF;
pub const FINAL_PACKAGE_ID: u16 = 0xF0F0;
pub const MAX_DATA_LENGTH: u32 = 0x00FF_FFFF;

// id + size header, 2 byte verify code
pub const PACKET_HEADER_SIZE: usize = 4;
pub const PACKET_OVERHEAD: usize = 6;
pub const MIN_PACKET_SIZE: u16 = 64;
pub const MAX_PACKET_SIZE: u16 = 512;
pub const DEFAULT_PACKET_SIZE: u16 = 512;

pub const SYNC_PULSES: u8 = 59;
pub const SYNC_ATTEMPTS: u8 = 2;
pub const PULSE_INTERVAL: Duration = Duration::from_millis(100);
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

pub const DEFAULT_BAUD_RATE: u32 = 115200;
