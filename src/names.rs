/* src/names.rs */

//! Static naming tables for trace rendering. Read-only for the process
//! lifetime, so they are shared across concurrent decode calls without
//! synchronization.

use crate::packet::{ConnectionState, PacketType};

static PTYPE_NAMES: [&str; 10] = [
	"error",
	"version negotiation",
	"client initial",
	"server stateless",
	"server cleartext",
	"client cleartext",
	"0rtt protected",
	"1rtt protected phi0",
	"1rtt protected phi1",
	"public reset",
];

static FRAME_NAMES: [&str; 12] = [
	"Padding",
	"CONNECTION_CLOSE",
	"RST_STREAM",
	"GOAWAY",
	"MAX_DATA",
	"MAX_STREAM_DATA",
	"MAX_STREAM_ID",
	"PING",
	"BLOCKED",
	"STREAM_BLOCKED",
	"STREAM_ID_NEEDED",
	"NEW_CONNECTION_ID",
];

static STATE_NAMES: [&str; 13] = [
	"client_init",
	"client_init_sent",
	"client_renegotiate",
	"client_renegotiating",
	"server_init",
	"client_handshake_start",
	"client_handshake_progress",
	"client_almost_ready",
	"client_ready",
	"server_almost_ready",
	"server_ready",
	"disconnecting",
	"disconnected",
];

/// Display name of a packet type.
#[must_use]
pub fn ptype_name(ptype: PacketType) -> &'static str {
	PTYPE_NAMES
		.get(ptype as usize)
		.copied()
		.unwrap_or("unknown")
}

/// Display name of a frame type byte, for tags in the named range
/// `0x00..=0x0b`. Tags outside the table yield `None` and are rendered as
/// unknown frames.
#[must_use]
pub fn frame_name(frame_id: u8) -> Option<&'static str> {
	FRAME_NAMES.get(frame_id as usize).copied()
}

/// Display name of a connection state.
#[must_use]
pub fn state_name(state: ConnectionState) -> &'static str {
	STATE_NAMES
		.get(state as usize)
		.copied()
		.unwrap_or("unknown")
}
