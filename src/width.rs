/* src/width.rs */

//! Field-width resolution for the 2-bit selectors embedded in frame tag
//! bytes. The early-draft wire image encodes field widths in-band, so every
//! frame decoder first resolves its selectors here before touching the
//! payload.

/// Width in bytes of a stream identifier field, from the 2-bit selector in
/// stream-frame tag bits 3–4.
///
/// Yields 1, 2, 3, or 4.
#[must_use]
pub fn stream_id_len(selector: u8) -> usize {
	1 + (selector & 3) as usize
}

/// Width in bytes of a stream offset field, from the 2-bit selector in
/// stream-frame tag bits 1–2.
///
/// Yields 0, 2, 4, or 8. A zero width means the offset is implicitly zero.
#[must_use]
pub fn stream_offset_len(selector: u8) -> usize {
	match selector & 3 {
		0 => 0,
		1 => 2,
		2 => 4,
		_ => 8,
	}
}

/// Width in bytes of an ACK largest-acknowledged or range field, from the
/// 2-bit selectors in ack-frame tag bits 2–3 and 0–1.
///
/// Yields 1, 2, 4, or 8. The range selector is shared by the first range and
/// every additional (gap, range) block in the frame.
#[must_use]
pub fn ack_field_len(selector: u8) -> usize {
	match selector & 3 {
		0 => 1,
		1 => 2,
		2 => 4,
		_ => 8,
	}
}

/// Read a big-endian unsigned integer of `width` bytes (at most 8) from the
/// start of `buf`. The caller has already verified that `buf` holds at least
/// `width` bytes.
pub(crate) fn read_be(buf: &[u8], width: usize) -> u64 {
	let mut val = 0u64;
	for &b in &buf[..width] {
		val = (val << 8) | u64::from(b);
	}
	val
}
