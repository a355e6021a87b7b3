/* tests/address.rs */

#![allow(missing_docs)]

use std::net::SocketAddr;

use quic_trace::{Direction, log_packet_address};

fn render(addr: &str, direction: Direction, length: usize) -> String {
	let addr: SocketAddr = addr.parse().unwrap();
	let mut out = Vec::new();
	log_packet_address(&mut out, &addr, direction, length).unwrap();
	String::from_utf8(out).unwrap()
}

#[test]
fn v4_sending() {
	assert_eq!(
		render("10.0.0.1:4433", Direction::Sending, 55),
		"Sending 55 bytes to 10.0.0.1:4433\n"
	);
}

#[test]
fn v4_receiving() {
	assert_eq!(
		render("192.168.1.9:443", Direction::Receiving, 1200),
		"Receiving 1200 bytes from 192.168.1.9:443\n"
	);
}

#[test]
fn v6_groups_are_not_zero_padded() {
	// 0x0db8 renders as "db8", not "0db8"; zero groups render as "0".
	assert_eq!(
		render("[2001:db8::1]:443", Direction::Sending, 64),
		"Sending 64 bytes to 2001:db8:0:0:0:0:0:1\n"
	);
}

#[test]
fn v6_no_compression_and_no_port() {
	// Group 0x0204: high byte 0x02 prints unpadded, low byte keeps its
	// two digits.
	assert_eq!(
		render("[fe80::204:61ff:fe9d:f156]:8443", Direction::Receiving, 99),
		"Receiving 99 bytes from fe80:0:0:0:204:61ff:fe9d:f156\n"
	);
}

#[test]
fn v6_all_zero_address() {
	assert_eq!(
		render("[::]:1", Direction::Sending, 1),
		"Sending 1 bytes to 0:0:0:0:0:0:0:0\n"
	);
}
