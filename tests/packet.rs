/* tests/packet.rs */

#![allow(missing_docs)]

use std::net::SocketAddr;

use quic_trace::{
	ConnectionState, ConnectionView, Direction, Error, PacketHeader, PacketType, ProtocolEngine,
	log_packet, log_processing,
};

struct FakeConnection(ConnectionState);

impl ConnectionView for FakeConnection {
	fn state(&self) -> ConnectionState {
		self.0
	}
}

/// Deterministic stand-in for the external QUIC engine.
struct FakeEngine {
	header: Option<PacketHeader>,
	connection: Option<FakeConnection>,
	checksum: usize,
	plaintext: Vec<u8>,
	decrypt_len: usize,
}

impl FakeEngine {
	fn new(header: Option<PacketHeader>) -> Self {
		FakeEngine {
			header,
			connection: None,
			checksum: 0,
			plaintext: Vec::new(),
			decrypt_len: 0,
		}
	}
}

impl ProtocolEngine for FakeEngine {
	fn parse_header(&self, packet: &[u8]) -> Result<PacketHeader, Error> {
		self.header.clone().ok_or(Error::BufferTooShort {
			need: 17,
			have: packet.len(),
		})
	}

	fn connection_by_address(&self, _addr: &SocketAddr) -> Option<&dyn ConnectionView> {
		self.connection
			.as_ref()
			.map(|cnx| cnx as &dyn ConnectionView)
	}

	fn connection_by_id(&self, _cnx_id: u64) -> Option<&dyn ConnectionView> {
		None
	}

	fn verify_checksum(&self, _packet: &[u8]) -> usize {
		self.checksum
	}

	fn decrypt(
		&self,
		_cnx: Option<&dyn ConnectionView>,
		_header: &PacketHeader,
		_packet: &[u8],
		out: &mut [u8],
	) -> usize {
		if self.plaintext.len() <= out.len() {
			out[..self.plaintext.len()].copy_from_slice(&self.plaintext);
		}
		self.decrypt_len
	}
}

fn peer() -> SocketAddr {
	"10.0.0.1:4433".parse().unwrap()
}

fn header(ptype: PacketType, offset: usize) -> PacketHeader {
	PacketHeader {
		ptype,
		cnx_id: 0xbadcafe,
		pn: 0xa,
		vn: 0x1,
		offset,
	}
}

fn render(engine: &FakeEngine, direction: Direction, packet: &[u8]) -> String {
	let mut out = Vec::new();
	log_packet(&mut out, engine, &peer(), direction, packet).unwrap();
	String::from_utf8(out).unwrap()
}

#[test]
fn unparseable_header_renders_one_line_and_stops() {
	let engine = FakeEngine::new(None);
	let text = render(&engine, Direction::Sending, &[0xde, 0xad, 0xbe, 0xef]);
	assert_eq!(
		text,
		concat!(
			"Sending 4 bytes to 10.0.0.1:4433\n",
			"   Cannot parse the packet header.\n",
			"\n",
		)
	);
}

#[test]
fn version_negotiation_lists_offered_versions() {
	// 9 header bytes, then exactly two 4-byte versions.
	let mut packet = vec![0u8; 9];
	packet.extend_from_slice(&0x0000_0001u32.to_be_bytes());
	packet.extend_from_slice(&0x6b33_43cfu32.to_be_bytes());

	let mut engine = FakeEngine::new(Some(header(PacketType::VersionNegotiation, 9)));
	engine.connection = Some(FakeConnection(ConnectionState::ClientInitSent));

	let text = render(&engine, Direction::Receiving, &packet);
	assert_eq!(
		text,
		concat!(
			"Receiving 17 bytes from 10.0.0.1:4433\n",
			"    Type: 1(version negotiation), CnxID: badcafe, Seq: a, Version 1\n",
			"    versions: 1, 6b3343cf, \n",
			"\n",
		)
	);
}

#[test]
fn version_negotiation_ignores_trailing_partial_version() {
	// 10 payload bytes: two versions plus 2 stray bytes.
	let mut packet = vec![0u8; 9];
	packet.extend_from_slice(&1u32.to_be_bytes());
	packet.extend_from_slice(&2u32.to_be_bytes());
	packet.extend_from_slice(&[0xff, 0xff]);

	let engine = FakeEngine::new(Some(header(PacketType::VersionNegotiation, 9)));
	let text = render(&engine, Direction::Receiving, &packet);
	assert!(text.contains("    versions: 1, 2, \n"));
}

#[test]
fn unresolved_connection_is_marked_unknown() {
	let engine = FakeEngine::new(Some(header(PacketType::ClientInitial, 17)));
	let text = render(&engine, Direction::Receiving, &[0u8; 25]);
	assert!(text.contains("CnxID: badcafe (unknown),"));
}

#[test]
fn cleartext_checksum_success_decodes_frames() {
	// 17 header bytes, one PING frame, 8 checksum bytes; the engine
	// reports 18 verified bytes.
	let mut packet = vec![0u8; 17];
	packet.push(0x07);
	packet.extend_from_slice(&[0u8; 8]);

	let mut engine = FakeEngine::new(Some(header(PacketType::ClientInitial, 17)));
	engine.checksum = 18;

	let text = render(&engine, Direction::Receiving, &packet);
	assert_eq!(
		text,
		concat!(
			"Receiving 26 bytes from 10.0.0.1:4433\n",
			"    Type: 2(client initial), CnxID: badcafe (unknown), Seq: a, Version 1\n",
			"    FNV1A checksum is correct (18 bytes).\n",
			"    PING frame\n",
			"\n",
		)
	);
}

#[test]
fn cleartext_checksum_failure_stops_before_frames() {
	let mut packet = vec![0u8; 17];
	packet.push(0x07);
	packet.extend_from_slice(&[0u8; 8]);

	let engine = FakeEngine::new(Some(header(PacketType::ServerCleartext, 17)));
	let text = render(&engine, Direction::Receiving, &packet);
	assert_eq!(
		text,
		concat!(
			"Receiving 26 bytes from 10.0.0.1:4433\n",
			"    Type: 4(server cleartext), CnxID: badcafe (unknown), Seq: a, Version 1\n",
			"    Error: cannot verify the FNV1A checksum.\n",
			"\n",
		)
	);
}

#[test]
fn protected_packet_received_decodes_decrypted_frames() {
	let mut engine = FakeEngine::new(Some(header(PacketType::OneRttProtectedPhi0, 5)));
	engine.plaintext = vec![0x00, 0x00, 0x00, 0x00, 0x00];
	engine.decrypt_len = 5;

	let text = render(&engine, Direction::Receiving, &[0u8; 40]);
	assert!(text.contains("    Decrypted 5 bytes\n"));
	assert!(text.contains("Padding, 5 bytes\n"));
}

#[test]
fn protected_packet_decryption_failure() {
	// A reported plaintext length beyond the input length signals failure.
	let mut engine = FakeEngine::new(Some(header(PacketType::OneRttProtectedPhi1, 5)));
	engine.decrypt_len = 41;

	let text = render(&engine, Direction::Receiving, &[0u8; 40]);
	assert!(text.contains("    Decryption failed!\n"));
	assert!(!text.contains("Decrypted"));
}

#[test]
fn protected_packet_sent_has_no_payload_decode() {
	let engine = FakeEngine::new(Some(header(PacketType::OneRttProtectedPhi0, 5)));
	let text = render(&engine, Direction::Sending, &[0u8; 40]);
	assert_eq!(
		text,
		concat!(
			"Sending 40 bytes to 10.0.0.1:4433\n",
			"    Type: 7(1rtt protected phi0), CnxID: badcafe (unknown), Seq: a, Version 1\n",
			"\n",
		)
	);
}

#[test]
fn stub_packet_types_render_header_only() {
	for ptype in [
		PacketType::ServerStateless,
		PacketType::ZeroRttProtected,
		PacketType::PublicReset,
		PacketType::Error,
	] {
		let engine = FakeEngine::new(Some(header(ptype, 5)));
		let text = render(&engine, Direction::Receiving, &[0u8; 20]);
		// Address line, header line, blank separator; nothing else.
		assert_eq!(
			text.trim_end_matches('\n').lines().count(),
			2,
			"ptype {ptype:?}"
		);
		assert!(text.ends_with("\n\n"), "ptype {ptype:?}");
	}
}

#[test]
fn every_branch_ends_with_blank_separator() {
	let engine = FakeEngine::new(None);
	let text = render(&engine, Direction::Sending, &[]);
	assert!(text.ends_with("\n\n"));
}

#[test]
fn processing_summary_names_the_state() {
	let cnx = FakeConnection(ConnectionState::ClientReady);
	let mut out = Vec::new();
	log_processing(&mut out, &cnx, 1200, 0).unwrap();
	assert_eq!(
		String::from_utf8(out).unwrap(),
		"Processed 1200 bytes, state = 8 (client_ready), return 0\n\n"
	);
}

#[test]
fn processing_summary_reports_result_code() {
	let cnx = FakeConnection(ConnectionState::Disconnecting);
	let mut out = Vec::new();
	log_processing(&mut out, &cnx, 31, -1).unwrap();
	assert_eq!(
		String::from_utf8(out).unwrap(),
		"Processed 31 bytes, state = 11 (disconnecting), return -1\n\n"
	);
}
