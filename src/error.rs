/* src/error.rs */

/// Errors reported by the header-parse collaborator.
///
/// Frame-level truncation is deliberately *not* represented here: a truncated
/// frame degrades to a rendered diagnostic line and a
/// [`FrameOutcome::Truncated`](crate::FrameOutcome) control-flow value, never
/// an error. Only the external header parser speaks in `Result`s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The input buffer is shorter than required.
	#[error("buffer too short: need at least {need} bytes, have {have}")]
	BufferTooShort {
		/// Minimum number of bytes required.
		need: usize,
		/// Actual number of bytes available.
		have: usize,
	},

	/// The packet-type tag does not map to a known packet type.
	#[error("unrecognized packet type (type byte: {0:#04x})")]
	InvalidPacketType(u8),

	/// The protocol version field is not one the engine understands.
	#[error("unsupported QUIC version: {0:#010x}")]
	UnsupportedVersion(u32),
}
