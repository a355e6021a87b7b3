/* src/packet.rs */

use std::io::{self, Write};
use std::net::SocketAddr;

use crate::address::log_packet_address;
use crate::error::Error;
use crate::frame::log_frames;
use crate::names::{ptype_name, state_name};

/// Largest packet the decoder will decrypt; sizes the private plaintext
/// buffer used for protected packets.
pub const MAX_PACKET_SIZE: usize = 1536;

/// Whether the traced packet was being sent or received by the local
/// endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// The packet is outbound.
	Sending,
	/// The packet is inbound.
	Receiving,
}

/// Nominal packet types of the early-draft wire image. Discriminants match
/// the naming-table indices used on the rendered header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
	/// Unparseable or reserved type value.
	Error = 0,
	/// Version negotiation packet.
	VersionNegotiation = 1,
	/// Client initial cleartext packet.
	ClientInitial = 2,
	/// Server stateless retry packet.
	ServerStateless = 3,
	/// Server cleartext handshake packet.
	ServerCleartext = 4,
	/// Client cleartext handshake packet.
	ClientCleartext = 5,
	/// 0-RTT protected packet.
	ZeroRttProtected = 6,
	/// 1-RTT protected packet, key phase 0.
	OneRttProtectedPhi0 = 7,
	/// 1-RTT protected packet, key phase 1.
	OneRttProtectedPhi1 = 8,
	/// Public reset packet.
	PublicReset = 9,
}

/// Connection states exposed by the protocol engine, rendered on the
/// post-processing summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ConnectionState {
	ClientInit = 0,
	ClientInitSent = 1,
	ClientRenegotiate = 2,
	ClientRenegotiating = 3,
	ServerInit = 4,
	ClientHandshakeStart = 5,
	ClientHandshakeProgress = 6,
	ClientAlmostReady = 7,
	ClientReady = 8,
	ServerAlmostReady = 9,
	ServerReady = 10,
	Disconnecting = 11,
	Disconnected = 12,
}

/// Cleartext packet header, as parsed by the external collaborator.
/// Immutable once parsed; scoped to one decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
	/// Packet type derived from the type byte.
	pub ptype: PacketType,
	/// Connection identifier, zero when absent.
	pub cnx_id: u64,
	/// Packet (sequence) number.
	pub pn: u32,
	/// Protocol version field.
	pub vn: u32,
	/// Byte offset where the type-specific payload begins.
	pub offset: usize,
}

/// Read-only view of a connection, used purely for display context.
pub trait ConnectionView {
	/// Current state of the connection's handshake machine.
	fn state(&self) -> ConnectionState;
}

/// The external QUIC engine this decoder observes.
///
/// Header parsing, connection lookup, checksum verification, and AEAD
/// decryption all live behind this trait so the decoder core can be driven
/// by deterministic fakes in tests, independent of any real cryptographic
/// engine. Every method is treated as a synchronous pure function.
pub trait ProtocolEngine {
	/// Parse the cleartext packet header.
	///
	/// # Errors
	///
	/// Returns an [`Error`] when the buffer does not hold a well-formed
	/// header; the trace renders one diagnostic line and stops.
	fn parse_header(&self, packet: &[u8]) -> Result<PacketHeader, Error>;

	/// Look up a connection by peer address.
	fn connection_by_address(&self, addr: &SocketAddr) -> Option<&dyn ConnectionView>;

	/// Look up a connection by connection identifier.
	fn connection_by_id(&self, cnx_id: u64) -> Option<&dyn ConnectionView>;

	/// Verify the cleartext packet checksum over the full packet. Returns
	/// the verified payload length, or 0 on failure.
	fn verify_checksum(&self, packet: &[u8]) -> usize;

	/// Decrypt a protected packet into `out`. Returns the plaintext length;
	/// a length greater than the input packet length signals failure.
	fn decrypt(
		&self,
		cnx: Option<&dyn ConnectionView>,
		header: &PacketHeader,
		packet: &[u8],
		out: &mut [u8],
	) -> usize;
}

/// Render the full trace for one wire packet: address line, header line,
/// and the per-type payload decode.
///
/// Every failure mode (unparseable header, checksum mismatch, decryption
/// failure, frame truncation) degrades to a rendered diagnostic line; the
/// call itself only fails if the output sink does. The trace always ends
/// with one blank separator line.
///
/// # Errors
///
/// Propagates write failures from the output sink.
pub fn log_packet<W: Write>(
	w: &mut W,
	engine: &dyn ProtocolEngine,
	addr: &SocketAddr,
	direction: Direction,
	packet: &[u8],
) -> io::Result<()> {
	#[cfg(feature = "tracing")]
	tracing::debug!(peer = %addr, length = packet.len(), "tracing QUIC packet");

	log_packet_address(w, addr, direction, packet.len())?;

	match engine.parse_header(packet) {
		Err(_) => {
			writeln!(w, "   Cannot parse the packet header.")?;
		}
		Ok(ph) => {
			let cnx = engine.connection_by_address(addr).or_else(|| {
				if ph.cnx_id != 0 {
					engine.connection_by_id(ph.cnx_id)
				} else {
					None
				}
			});

			log_packet_header(w, cnx.is_some(), &ph)?;

			match ph.ptype {
				PacketType::VersionNegotiation => {
					log_negotiation_packet(w, packet, &ph)?;
				}
				PacketType::ClientInitial
				| PacketType::ServerCleartext
				| PacketType::ClientCleartext => {
					let verified = log_cleartext_checksum(w, engine, packet)?;
					if verified > ph.offset && verified <= packet.len() {
						log_frames(w, &packet[ph.offset..verified])?;
					}
				}
				PacketType::OneRttProtectedPhi0 | PacketType::OneRttProtectedPhi1
					if direction == Direction::Receiving =>
				{
					log_decrypt_encrypted(w, engine, cnx, &ph, packet)?;
				}
				// Sending side of 1-RTT has nothing to decrypt to; stateless,
				// 0-RTT, public reset, and error packets carry no decodable
				// payload here.
				_ => {}
			}
		}
	}

	writeln!(w)
}

/// Render the parsed header line via the naming tables. `known` marks
/// whether connection lookup resolved the packet to a live connection.
///
/// # Errors
///
/// Propagates write failures from the output sink.
pub fn log_packet_header<W: Write>(w: &mut W, known: bool, ph: &PacketHeader) -> io::Result<()> {
	writeln!(
		w,
		"    Type: {}({}), CnxID: {:x}{}, Seq: {:x}, Version {:x}",
		ph.ptype as u8,
		ptype_name(ph.ptype),
		ph.cnx_id,
		if known { "" } else { " (unknown)" },
		ph.pn,
		ph.vn
	)
}

/// Render the version list of a version negotiation packet: 4-byte
/// big-endian values read from the header offset until fewer than 4 bytes
/// remain.
///
/// # Errors
///
/// Propagates write failures from the output sink.
pub fn log_negotiation_packet<W: Write>(
	w: &mut W,
	packet: &[u8],
	ph: &PacketHeader,
) -> io::Result<()> {
	let mut cursor = ph.offset;

	write!(w, "    versions: ")?;
	while cursor + 4 <= packet.len() {
		let vn = u32::from_be_bytes([
			packet[cursor],
			packet[cursor + 1],
			packet[cursor + 2],
			packet[cursor + 3],
		]);
		cursor += 4;
		write!(w, "{vn:x}, ")?;
	}
	writeln!(w)
}

/// Run checksum verification over a cleartext packet and render the result.
/// Returns the verified payload length, 0 on failure.
///
/// # Errors
///
/// Propagates write failures from the output sink.
pub fn log_cleartext_checksum<W: Write>(
	w: &mut W,
	engine: &dyn ProtocolEngine,
	packet: &[u8],
) -> io::Result<usize> {
	let verified = engine.verify_checksum(packet);
	if verified == 0 {
		writeln!(w, "    Error: cannot verify the FNV1A checksum.")?;
	} else {
		writeln!(w, "    FNV1A checksum is correct ({verified} bytes).")?;
	}
	Ok(verified)
}

fn log_decrypt_encrypted<W: Write>(
	w: &mut W,
	engine: &dyn ProtocolEngine,
	cnx: Option<&dyn ConnectionView>,
	ph: &PacketHeader,
	packet: &[u8],
) -> io::Result<()> {
	// Decrypt into a private copy; the wire buffer stays untouched.
	let mut decrypted = [0u8; MAX_PACKET_SIZE];
	let decrypted_length = engine.decrypt(cnx, ph, packet, &mut decrypted);

	match decrypted.get(..decrypted_length) {
		Some(plain) if decrypted_length <= packet.len() => {
			writeln!(w, "    Decrypted {decrypted_length} bytes")?;
			log_frames(w, plain)
		}
		_ => writeln!(w, "    Decryption failed!"),
	}
}

/// Render the post-processing summary line: bytes handled, the connection's
/// current state, and the engine's result code, followed by a blank line.
///
/// # Errors
///
/// Propagates write failures from the output sink.
pub fn log_processing<W: Write>(
	w: &mut W,
	cnx: &dyn ConnectionView,
	length: usize,
	ret: i32,
) -> io::Result<()> {
	let state = cnx.state();
	writeln!(
		w,
		"Processed {length} bytes, state = {} ({}), return {ret}\n",
		state as u8,
		state_name(state)
	)
}
