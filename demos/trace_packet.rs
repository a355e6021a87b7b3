/* demos/trace_packet.rs */

#![allow(missing_docs)]

// Traces a cleartext packet end to end through a toy protocol engine. The
// engine fakes header parsing and checksum verification the way the real
// QUIC engine would provide them; the decoder itself never touches keys or
// connection state.

use std::io;
use std::net::SocketAddr;

use quic_trace::{
	ConnectionState, ConnectionView, Direction, Error, PacketHeader, PacketType, ProtocolEngine,
	log_packet, log_processing,
};

const HEADER_LEN: usize = 17;
const CHECKSUM_LEN: usize = 8;

struct ToyConnection;

impl ConnectionView for ToyConnection {
	fn state(&self) -> ConnectionState {
		ConnectionState::ClientHandshakeProgress
	}
}

struct ToyEngine {
	connection: ToyConnection,
}

impl ProtocolEngine for ToyEngine {
	fn parse_header(&self, packet: &[u8]) -> Result<PacketHeader, Error> {
		if packet.len() < HEADER_LEN {
			return Err(Error::BufferTooShort {
				need: HEADER_LEN,
				have: packet.len(),
			});
		}
		Ok(PacketHeader {
			ptype: PacketType::ClientInitial,
			cnx_id: 0x1234_5678_9abc,
			pn: 1,
			vn: 0xff00_0005,
			offset: HEADER_LEN,
		})
	}

	fn connection_by_address(&self, _addr: &SocketAddr) -> Option<&dyn ConnectionView> {
		Some(&self.connection)
	}

	fn connection_by_id(&self, _cnx_id: u64) -> Option<&dyn ConnectionView> {
		Some(&self.connection)
	}

	fn verify_checksum(&self, packet: &[u8]) -> usize {
		// Pretend the trailing checksum always verifies.
		packet.len().saturating_sub(CHECKSUM_LEN)
	}

	fn decrypt(
		&self,
		_cnx: Option<&dyn ConnectionView>,
		_header: &PacketHeader,
		_packet: &[u8],
		_out: &mut [u8],
	) -> usize {
		0
	}
}

fn main() -> io::Result<()> {
	let engine = ToyEngine {
		connection: ToyConnection,
	};
	let peer: SocketAddr = "192.0.2.7:4433".parse().unwrap();
	let packet = build_sample_packet();

	let mut stdout = io::stdout().lock();
	log_packet(&mut stdout, &engine, &peer, Direction::Receiving, &packet)?;
	log_processing(&mut stdout, &engine.connection, packet.len(), 0)
}

fn build_sample_packet() -> Vec<u8> {
	let mut packet = vec![0xAA; HEADER_LEN];

	// Frame payload: padding, then a stream frame that takes the remainder
	// of the verified region.
	packet.extend_from_slice(&[0x00; 3]);
	packet.extend_from_slice(&[0xc0, 0x01]);
	packet.extend_from_slice(b"client hello");

	// Trailing FNV1A checksum bytes (the toy engine does not inspect them).
	packet.extend_from_slice(&[0x00; CHECKSUM_LEN]);

	packet
}
