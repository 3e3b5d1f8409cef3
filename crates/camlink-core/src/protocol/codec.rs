//! Line codec for the Camlink control channel.
//!
//! Wire format:
//! ```text
//! [message bytes][terminator]
//! ```
//! where the terminator is LF (`\n`), CRLF (`\r\n`), or a lone CR (`\r`).
//! There is no length prefix and no schema — the terminator is the only
//! framing. Terminators are stripped before a line is handed to the caller.
//!
//! # Why a streaming decoder? (for beginners)
//!
//! TCP is a *stream* protocol: a single `read()` call may return half a line,
//! or three lines and the beginning of a fourth. The connection layer
//! therefore accumulates all received bytes in a buffer and calls
//! [`decode_line`] in a loop; each call either extracts one complete line and
//! reports how many bytes it consumed, or returns `None` to say "wait for
//! more bytes".
//!
//! The `at_eof` flag exists for two stream-end cases that only the caller can
//! detect:
//!
//! - A final line with no terminator (the peer wrote `"C"` and closed) is
//!   still a line, and is delivered once the caller knows no more bytes are
//!   coming.
//! - A lone CR as the last buffered byte is ambiguous mid-stream (it may be
//!   the first half of a CRLF split across two reads), but unambiguous at
//!   EOF.

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Extracts the first complete line from `buf`.
///
/// Returns the line (terminator stripped, invalid UTF-8 replaced with
/// U+FFFD) and the number of bytes consumed, so the caller can drain its
/// buffer and call again. Returns `None` when `buf` holds no complete line
/// yet.
///
/// `at_eof` must be `true` once the caller knows the stream has ended; it
/// causes trailing unterminated bytes (and a trailing lone CR) to be
/// delivered as a final line.
///
/// A zero-length line (two adjacent terminators) is returned as an empty
/// string — it is a message like any other, not end-of-stream.
///
/// # Examples
///
/// ```rust
/// use camlink_core::decode_line;
///
/// let buf = b"start\r\nend";
/// let (line, consumed) = decode_line(buf, false).unwrap();
/// assert_eq!(line, "start");
/// assert_eq!(consumed, 7);
///
/// // "end" has no terminator: incomplete mid-stream, a final line at EOF.
/// assert_eq!(decode_line(&buf[consumed..], false), None);
/// assert_eq!(decode_line(&buf[consumed..], true), Some(("end".to_string(), 3)));
/// ```
pub fn decode_line(buf: &[u8], at_eof: bool) -> Option<(String, usize)> {
    for (i, byte) in buf.iter().enumerate() {
        match byte {
            b'\n' => return Some((to_text(&buf[..i]), i + 1)),
            b'\r' => {
                if i + 1 < buf.len() {
                    // CRLF consumes both bytes; a CR followed by anything
                    // else is a lone-CR terminator.
                    let consumed = if buf[i + 1] == b'\n' { i + 2 } else { i + 1 };
                    return Some((to_text(&buf[..i]), consumed));
                }
                if at_eof {
                    return Some((to_text(&buf[..i]), i + 1));
                }
                // CR at the end of the buffer mid-stream: the next read may
                // deliver the LF half of a CRLF.
                return None;
            }
            _ => {}
        }
    }

    if at_eof && !buf.is_empty() {
        // Final line with no trailing terminator.
        return Some((to_text(buf), buf.len()));
    }
    None
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes an outbound command as a terminated line.
///
/// The text bytes are followed by a single LF. No escaping is performed: a
/// `text` containing an embedded terminator frames as multiple lines on the
/// wire, exactly as it would when printed.
///
/// # Examples
///
/// ```rust
/// use camlink_core::encode_command;
///
/// assert_eq!(encode_command("start"), b"start\n");
/// assert_eq!(encode_command(""), b"\n");
/// ```
pub fn encode_command(text: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(text.len() + 1);
    buf.extend_from_slice(text.as_bytes());
    buf.push(b'\n');
    buf
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Converts raw line bytes to text, replacing invalid UTF-8 with U+FFFD.
///
/// The wire carries "UTF-8-ish" text; a tolerant decode keeps a single bad
/// byte from killing the whole connection.
fn to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
