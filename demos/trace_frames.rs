/* demos/trace_frames.rs */

#![allow(missing_docs)]

// Decodes a hand-built frame sequence and prints the trace to stdout. This
// demo exercises only the frame layer; no engine collaborator is needed.

use std::io;

fn main() -> io::Result<()> {
	let payload = build_sample_payload();

	let mut stdout = io::stdout().lock();
	quic_trace::log_frames(&mut stdout, &payload)
}

fn build_sample_payload() -> Vec<u8> {
	let mut payload = Vec::new();

	// Padding run.
	payload.extend_from_slice(&[0x00; 4]);

	// Ack frame: 2-byte largest, 1-byte ranges, one extra block.
	payload.extend_from_slice(&[
		0xb4, 0x01, 0x00, // tag, block count, timestamp count
		0x12, 0x34, // largest acknowledged
		0x00, 0x00, // ack delay
		0x05, // first range
		0x01, 0x03, // gap, range
	]);

	// Stream frame with an explicit 16-bit length.
	payload.extend_from_slice(&[0xc1, 0x07, 0x00, 0x04]);
	payload.extend_from_slice(b"ping");

	// Stream frame with implicit length: swallows the rest of the buffer.
	payload.extend_from_slice(&[0xc0, 0x09]);
	payload.extend_from_slice(b"hello quic trace");

	payload
}
