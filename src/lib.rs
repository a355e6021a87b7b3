/* src/lib.rs */

//! Human-auditable trace decoder for raw QUIC wire packets.
//!
//! This crate observes packets flowing through an external QUIC engine and
//! renders each one as a block of text lines for debugging and conformance
//! inspection. It never touches connection state, retransmits, or validates
//! semantics; it only interprets the self-describing binary layout — the
//! packet-type byte, the frame tag bytes, and the field widths those tags
//! encode — and reports what it finds.
//!
//! Three layers of functionality:
//!
//! **Layer 1 — Frame decoding**: classify a tag byte ([`classify_frame`]),
//! decode single stream or ack frames ([`log_stream_frame`],
//! [`log_ack_frame`]), or walk a whole payload region ([`log_frames`]).
//!
//! **Layer 2 — Packet dispatch**: [`log_packet`] renders the address and
//! header lines and branches per packet type, delegating header parsing,
//! checksum verification, and decryption to a caller-supplied
//! [`ProtocolEngine`].
//!
//! **Layer 3 — Connection summaries**: [`log_processing`] renders the
//! post-processing state line for a [`ConnectionView`].
//!
//! Malformed or adversarial input can never make the decoder read outside
//! the supplied buffer or loop unboundedly: every truncation fault renders
//! a diagnostic line and stops the scan of that packet.

#![warn(missing_docs)]

mod address;
mod error;
mod frame;
mod names;
mod packet;
mod width;

pub use address::log_packet_address;
pub use error::Error;
pub use frame::{
	AckFrameView, FrameClass, FrameOutcome, StreamFrameView, classify_frame, log_ack_frame,
	log_frames, log_stream_frame,
};
pub use names::{frame_name, ptype_name, state_name};
pub use packet::{
	ConnectionState, ConnectionView, Direction, MAX_PACKET_SIZE, PacketHeader, PacketType,
	ProtocolEngine, log_cleartext_checksum, log_negotiation_packet, log_packet,
	log_packet_header, log_processing,
};
pub use width::{ack_field_len, stream_id_len, stream_offset_len};
