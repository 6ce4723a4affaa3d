pub mod commands;
pub mod exchange;
pub mod packet;
pub mod transfer;

pub fn format_bytes(bytes: &[u8]) -> String {
	bytes
		.iter()
		.map(|b| format!("{b:#04x}"))
		.collect::<Vec<_>>()
		.join(", ")
}
