/* src/address.rs */

use std::io::{self, Write};
use std::net::SocketAddr;

use crate::packet::Direction;

/// Render the per-packet address line: direction, byte count, and peer
/// address.
///
/// IPv4 renders as `a.b.c.d:port`. IPv6 renders as eight colon-separated
/// groups with no `::` compression and no zero padding; a group whose high
/// byte is zero renders only the low byte. This exact non-compressed form is
/// kept for trace-format compatibility with existing tooling.
///
/// # Errors
///
/// Propagates write failures from the output sink.
pub fn log_packet_address<W: Write>(
	w: &mut W,
	addr: &SocketAddr,
	direction: Direction,
	length: usize,
) -> io::Result<()> {
	match direction {
		Direction::Sending => write!(w, "Sending {length} bytes to ")?,
		Direction::Receiving => write!(w, "Receiving {length} bytes from ")?,
	}

	match addr {
		SocketAddr::V4(v4) => writeln!(w, "{}:{}", v4.ip(), v4.port()),
		SocketAddr::V6(v6) => {
			let octets = v6.ip().octets();
			for i in 0..8 {
				if i != 0 {
					write!(w, ":")?;
				}
				let hi = octets[2 * i];
				let lo = octets[2 * i + 1];
				if hi != 0 {
					write!(w, "{hi:x}{lo:02x}")?;
				} else {
					write!(w, "{lo:x}")?;
				}
			}
			writeln!(w)
		}
	}
}
