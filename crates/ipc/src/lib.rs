//! brim IPC Protocol
//!
//! The single-instance coordination endpoint and the wire format used to
//! forward command-line directives into a running daemon.
//!
//! The endpoint is a Unix-domain socket under the session runtime
//! directory; its existence is the sole "already running" signal. A wire
//! message is the requesting process's argument vector: each argument's
//! raw bytes followed by one NUL, with one additional NUL terminating the
//! message. There is no version field and no checksum.

use std::path::PathBuf;

use thiserror::Error;

/// File name of the coordination socket within the runtime directory.
pub const SOCKET_FILE_NAME: &str = "brim.sock";

/// Errors from encoding an argument vector for the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("argument `{0}` contains an embedded NUL byte")]
    EmbeddedNul(String),
}

/// The well-known path of the coordination socket.
///
/// Prefers `$XDG_RUNTIME_DIR` (per-user, cleared on logout); falls back to
/// the system temp directory when no runtime directory is available.
pub fn socket_path() -> PathBuf {
    directories::BaseDirs::new()
        .and_then(|dirs| dirs.runtime_dir().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(std::env::temp_dir)
        .join(SOCKET_FILE_NAME)
}

/// Encode an argument vector into a wire message.
///
/// Arguments may not contain NUL bytes; the encoding has no escaping.
pub fn encode_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<u8>, WireError> {
    let mut message = Vec::with_capacity(
        args.iter().map(|arg| arg.as_ref().len() + 1).sum::<usize>() + 1,
    );
    for arg in args {
        let arg = arg.as_ref();
        if arg.as_bytes().contains(&0) {
            return Err(WireError::EmbeddedNul(arg.to_string()));
        }
        message.extend_from_slice(arg.as_bytes());
        message.push(0);
    }
    message.push(0);
    Ok(message)
}

/// Decode a wire message back into its argument tokens.
///
/// Walks NUL-delimited spans, advancing `len + 1` bytes per token, until
/// an empty span (the double-NUL terminator) or the end of the buffer.
/// Truncated messages yield whatever tokens decoded cleanly before the
/// cut — the caller applies those and drops the rest.
pub fn decode_message(buf: &[u8]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        let span_end = buf[pos..]
            .iter()
            .position(|&byte| byte == 0)
            .map_or(buf.len(), |nul| pos + nul);
        if span_end == pos {
            break;
        }
        tokens.push(String::from_utf8_lossy(&buf[pos..span_end]).into_owned());
        pos = span_end + 1;
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_tokens_and_order() {
        let args = ["border_width=6", "active_color=0xffaa00ff", "hidpi=on"];
        let message = encode_args(&args).unwrap();
        assert_eq!(decode_message(&message), args);
    }

    #[test]
    fn encoding_terminates_with_double_nul() {
        let message = encode_args(&["border_width=6"]).unwrap();
        assert_eq!(message, b"border_width=6\0\0");
    }

    #[test]
    fn empty_argument_vector_is_a_lone_terminator() {
        let message = encode_args::<&str>(&[]).unwrap();
        assert_eq!(message, b"\0");
        assert!(decode_message(&message).is_empty());
    }

    #[test]
    fn embedded_nul_is_rejected() {
        let result = encode_args(&["bad\0token"]);
        assert!(matches!(result, Err(WireError::EmbeddedNul(_))));
    }

    #[test]
    fn truncated_message_yields_complete_tokens_only() {
        // Terminator missing entirely: the final span still decodes.
        assert_eq!(decode_message(b"a=1\0b=2"), vec!["a=1", "b=2"]);
        // Empty buffer decodes to nothing.
        assert!(decode_message(b"").is_empty());
    }

    #[test]
    fn decoding_stops_at_the_terminator() {
        // Bytes after the double NUL are not part of the message.
        assert_eq!(decode_message(b"a=1\0\0trailing\0"), vec!["a=1"]);
    }

    #[test]
    fn socket_path_uses_the_well_known_file_name() {
        let path = socket_path();
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some(SOCKET_FILE_NAME)
        );
    }
}
