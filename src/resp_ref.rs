//! Reference RESP parser: an incremental multi-bulk decoder with the
//! production characteristics of the system RESPB is benchmarked against.
//!
//! Grounded in `examples/original_source/protocol-bench/src/valkey_resp_parser.c`
//! (itself a port of Valkey's `networking.c:processMultibulkBuffer`), and in
//! this crate's own `bytes`-based buffer idiom already used by the teacher
//! crate's `protocol.rs::parse_many`. Unlike RESPB's parser, this one is
//! genuinely stateful: bulk/multibulk counters persist across calls so a
//! command can be assembled from several network reads.

use bytes::{Buf, Bytes, BytesMut};
use thiserror::Error;

/// A single line must terminate within this many bytes, or the connection
/// is considered abusive (Valkey's `PROTO_INLINE_MAX_SIZE`).
pub const PROTO_INLINE_MAX_SIZE: usize = 64 * 1024;
/// Bulk arguments at or above this size get the zero-copy "big arg" path.
pub const PROTO_MBULK_BIG_ARG: usize = 32 * 1024;
/// Absolute ceiling on any single bulk string.
pub const PROTO_BULK_MAX_LEN: i64 = 512 * 1024 * 1024;
/// Tighter ceilings applied while a connection has not yet authenticated.
pub const UNAUTH_MAX_MULTIBULK_LEN: i64 = 10;
pub const UNAUTH_MAX_BULK_LEN: i64 = 16 * 1024;

/// A tiny, local bitflags implementation: the reference's error taxonomy is
/// seven named bits, which does not warrant pulling in the `bitflags`
/// crate (not already part of the teacher's dependency stack).
macro_rules! bitflags_lite {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $ty:ty {
            $(const $flag:ident = $val:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name(pub $ty);
        impl $name {
            $(pub const $flag: $name = $name($val);)*
            pub const fn empty() -> Self { $name(0) }
            pub fn contains(self, other: $name) -> bool { self.0 & other.0 == other.0 }
            pub fn insert(&mut self, other: $name) { self.0 |= other.0; }
        }
        impl std::ops::BitOr for $name {
            type Output = $name;
            fn bitor(self, rhs: $name) -> $name { $name(self.0 | rhs.0) }
        }
    };
}

bitflags_lite! {
    /// Error taxonomy for a failed parse, mirroring the reference's bit
    /// flags so callers can distinguish "which protection tripped".
    pub struct ProtoError: u8 {
        const BIG_MULTIBULK = 0b0000_0001;
        const INVALID_MULTIBULK_LEN = 0b0000_0010;
        const UNAUTH_MULTIBULK = 0b0000_0100;
        const BIG_BULK_COUNT = 0b0000_1000;
        const UNEXPECTED_CHAR = 0b0001_0000;
        const INVALID_BULK_LEN = 0b0010_0000;
        const UNAUTH_BULK = 0b0100_0000;
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RespError {
    #[error("protocol error: too big mbulk count")]
    BigMultibulk,
    #[error("protocol error: invalid multibulk length")]
    InvalidMultibulkLen,
    #[error("protocol error: unauthenticated multibulk length")]
    UnauthMultibulk,
    #[error("protocol error: too big bulk count string")]
    BigBulkCount,
    #[error("protocol error: expected '$', got something else")]
    UnexpectedChar,
    #[error("protocol error: invalid bulk length")]
    InvalidBulkLen,
    #[error("protocol error: unauthenticated bulk length")]
    UnauthBulk,
    #[error("protocol error: inline command too long")]
    InlineTooLong,
}

impl RespError {
    pub fn flags(&self) -> ProtoError {
        match self {
            RespError::BigMultibulk => ProtoError::BIG_MULTIBULK,
            RespError::InvalidMultibulkLen => ProtoError::INVALID_MULTIBULK_LEN,
            RespError::UnauthMultibulk => ProtoError::UNAUTH_MULTIBULK,
            RespError::BigBulkCount => ProtoError::BIG_BULK_COUNT,
            RespError::UnexpectedChar => ProtoError::UNEXPECTED_CHAR,
            RespError::InvalidBulkLen => ProtoError::INVALID_BULK_LEN,
            RespError::UnauthBulk => ProtoError::UNAUTH_BULK,
            RespError::InlineTooLong => ProtoError::empty(),
        }
    }
}

/// Outcome of one `ClientState::parse_command` call.
#[derive(Debug)]
pub enum RespOutcome {
    Complete(Vec<Bytes>),
    Incomplete,
}

/// Per-connection incremental parse state. Mirrors the reference's
/// `valkey_client` struct field-for-field (SPEC_FULL.md §3.1).
pub struct ClientState {
    pub querybuf: BytesMut,
    pub qb_pos: usize,
    pub multibulklen: i64,
    pub bulklen: i64,
    pub argv: Vec<Bytes>,
    pub authenticated: bool,
    pub querybuf_peak: usize,
    pub net_input_bytes_curr_cmd: usize,
}

impl ClientState {
    pub fn new() -> Self {
        ClientState {
            querybuf: BytesMut::new(),
            qb_pos: 0,
            multibulklen: 0,
            bulklen: -1,
            argv: Vec::new(),
            authenticated: true,
            querybuf_peak: 0,
            net_input_bytes_curr_cmd: 0,
        }
    }

    /// Feed more bytes into the connection's input buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.querybuf.extend_from_slice(data);
        self.querybuf_peak = self.querybuf_peak.max(self.querybuf.len());
    }

    /// Reset parser state between commands, keeping unconsumed bytes.
    fn reset_command_state(&mut self) {
        self.multibulklen = 0;
        self.bulklen = -1;
        self.argv.clear();
    }

    fn remaining(&self) -> &[u8] {
        &self.querybuf[self.qb_pos..]
    }

    fn find_crlf(&self, from: usize) -> Option<usize> {
        let buf = &self.querybuf[from..];
        buf.windows(2).position(|w| w == b"\r\n").map(|p| from + p)
    }

    /// Attempt to parse exactly one command from the current buffer.
    pub fn parse_command(&mut self) -> Result<RespOutcome, RespError> {
        if self.remaining().is_empty() {
            return Ok(RespOutcome::Incomplete);
        }
        if self.remaining()[0] != b'*' {
            return Err(RespError::UnexpectedChar);
        }

        let start_pos = self.qb_pos;

        if self.multibulklen == 0 {
            let Some(nl) = self.find_crlf(self.qb_pos) else {
                if self.remaining().len() > PROTO_INLINE_MAX_SIZE {
                    return Err(RespError::InlineTooLong);
                }
                return Ok(RespOutcome::Incomplete);
            };
            let line = &self.querybuf[self.qb_pos + 1..nl];
            let count: i64 = std::str::from_utf8(line)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or(RespError::InvalidMultibulkLen)?;
            let max = if self.authenticated {
                1024 * 1024
            } else {
                UNAUTH_MAX_MULTIBULK_LEN
            };
            if count > max {
                return Err(if self.authenticated {
                    RespError::BigMultibulk
                } else {
                    RespError::UnauthMultibulk
                });
            }
            if count <= 0 {
                self.qb_pos = nl + 2;
                self.reset_command_state();
                return Ok(RespOutcome::Complete(Vec::new()));
            }
            self.qb_pos = nl + 2;
            self.multibulklen = count;
            self.argv = Vec::with_capacity(count as usize);
        }

        let mut bytes_consumed = self.qb_pos - start_pos;

        while self.multibulklen > 0 {
            if self.bulklen == -1 {
                let Some(nl) = self.find_crlf(self.qb_pos) else {
                    if self.remaining().len() > PROTO_INLINE_MAX_SIZE {
                        return Err(RespError::BigBulkCount);
                    }
                    return Ok(RespOutcome::Incomplete);
                };
                if self.remaining().is_empty() || self.querybuf[self.qb_pos] != b'$' {
                    return Err(RespError::UnexpectedChar);
                }
                let line = &self.querybuf[self.qb_pos + 1..nl];
                let len: i64 = std::str::from_utf8(line)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(RespError::InvalidBulkLen)?;
                let max = if self.authenticated {
                    PROTO_BULK_MAX_LEN
                } else {
                    UNAUTH_MAX_BULK_LEN
                };
                if len < 0 || len > max {
                    return Err(if self.authenticated {
                        RespError::InvalidBulkLen
                    } else {
                        RespError::UnauthBulk
                    });
                }
                bytes_consumed += nl + 2 - self.qb_pos;
                self.qb_pos = nl + 2;
                self.bulklen = len;
            }

            let need = self.bulklen as usize + 2;
            if self.remaining().len() < need {
                return Ok(RespOutcome::Incomplete);
            }

            // Zero-copy big-arg path: when a single large argument fills the
            // rest of the buffer exactly, take ownership of it instead of
            // copying (SPEC_FULL.md §4.3). Otherwise fall back to a copy,
            // which is the only safe option once other bytes share the buffer.
            let is_whole_buffer = self.bulklen as usize >= PROTO_MBULK_BIG_ARG
                && self.querybuf.len() == self.qb_pos + need;
            let arg = if is_whole_buffer {
                let owned = std::mem::replace(&mut self.querybuf, BytesMut::new());
                let start = self.qb_pos;
                let frozen = owned.freeze();
                let slice = frozen.slice(start..start + self.bulklen as usize);
                bytes_consumed += need;
                self.qb_pos = 0;
                slice
            } else {
                let slice = Bytes::copy_from_slice(
                    &self.querybuf[self.qb_pos..self.qb_pos + self.bulklen as usize],
                );
                self.qb_pos += need;
                bytes_consumed += need;
                slice
            };

            self.argv.push(arg);
            self.bulklen = -1;
            self.multibulklen -= 1;
        }

        let argv = std::mem::take(&mut self.argv);
        self.net_input_bytes_curr_cmd = bytes_consumed;
        self.reset_command_state();
        self.compact();
        Ok(RespOutcome::Complete(argv))
    }

    /// Drop already-consumed bytes once the query buffer grows large,
    /// matching the reference's periodic compaction.
    fn compact(&mut self) {
        if self.qb_pos > 0 {
            self.querybuf.advance(self.qb_pos);
            self.qb_pos = 0;
        }
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_command() {
        let mut c = ClientState::new();
        c.feed(b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n");
        match c.parse_command().unwrap() {
            RespOutcome::Complete(argv) => {
                assert_eq!(argv.len(), 2);
                assert_eq!(&argv[0][..], b"GET");
                assert_eq!(&argv[1][..], b"mykey");
            }
            RespOutcome::Incomplete => panic!("expected complete"),
        }
    }

    #[test]
    fn incomplete_on_partial_command() {
        let mut c = ClientState::new();
        c.feed(b"*2\r\n$3\r\nGET\r\n$5\r\nmyk");
        assert!(matches!(c.parse_command().unwrap(), RespOutcome::Incomplete));
    }

    #[test]
    fn pipeline_of_two_commands() {
        let mut c = ClientState::new();
        c.feed(b"*1\r\n$4\r\nPING\r\n*1\r\n$4\r\nPING\r\n");
        assert!(matches!(c.parse_command().unwrap(), RespOutcome::Complete(_)));
        assert!(matches!(c.parse_command().unwrap(), RespOutcome::Complete(_)));
        assert!(matches!(c.parse_command().unwrap(), RespOutcome::Incomplete));
    }

    #[test]
    fn oversized_multibulk_without_auth_is_rejected() {
        let mut c = ClientState::new();
        c.authenticated = false;
        c.feed(b"*20\r\n");
        assert_eq!(c.parse_command().unwrap_err(), RespError::UnauthMultibulk);
    }

    #[test]
    fn big_multibulk_line_without_terminator_errors_when_over_limit() {
        let mut c = ClientState::new();
        let junk = vec![b'1'; PROTO_INLINE_MAX_SIZE + 1];
        c.feed(b"*");
        c.feed(&junk);
        assert!(matches!(c.parse_command(), Err(RespError::InlineTooLong)));
    }
}
