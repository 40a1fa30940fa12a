//! RESPB: a binary command protocol for Redis/Valkey-compatible services.
//!
//! See `SPEC_FULL.md` §4.1/§4.2/§6.1 for the wire format, the opcode
//! catalogue, and the parser/serializer contracts this module implements.

pub mod io;
pub mod opcodes;
pub mod parser;
pub mod serializer;
pub mod types;

pub use opcodes::{name as opcode_name, RESPB_MAX_ARGS};
pub use parser::parse_command;
pub use serializer::serialize_command;
pub use types::{Arg, Command, ParseOutcome, RespbError};

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack<'a>(out: ParseOutcome<'a>) -> (Command<'a>, usize) {
        match out {
            ParseOutcome::Complete(cmd, n) => (cmd, n),
            ParseOutcome::Incomplete => panic!("expected a complete parse"),
        }
    }

    #[test]
    fn get_mykey() {
        // opcode=0x0000 mux=0x0000 str2("mykey")
        let bytes: &[u8] = &[0x00, 0x00, 0x00, 0x00, 0x00, 0x05, b'm', b'y', b'k', b'e', b'y'];
        let (cmd, consumed) = unpack(parse_command(bytes).unwrap());
        assert_eq!(cmd.opcode, opcodes::OP_GET);
        assert_eq!(cmd.argc, 1);
        assert_eq!(cmd.args()[0], b"mykey");
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn set_mykey_myvalue() {
        let mut bytes = vec![0x00, 0x01, 0x00, 0x00]; // SET, mux=0
        bytes.extend_from_slice(&[0x00, 0x05]);
        bytes.extend_from_slice(b"mykey");
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x07]);
        bytes.extend_from_slice(b"myvalue");
        bytes.extend_from_slice(&[0u8; 9]); // flags + expiry
        let (cmd, consumed) = unpack(parse_command(&bytes).unwrap());
        assert_eq!(cmd.opcode, opcodes::OP_SET);
        assert_eq!(cmd.argc, 2);
        assert_eq!(cmd.args()[0], b"mykey");
        assert_eq!(cmd.args()[1], b"myvalue");
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn mget_three_keys() {
        let mut bytes = vec![0x00, 0x0C, 0x00, 0x00, 0x00, 0x03];
        for k in ["key1", "key2", "key3"] {
            bytes.extend_from_slice(&(k.len() as u16).to_be_bytes());
            bytes.extend_from_slice(k.as_bytes());
        }
        let (cmd, consumed) = unpack(parse_command(&bytes).unwrap());
        assert_eq!(cmd.opcode, opcodes::OP_MGET);
        assert_eq!(cmd.argc, 3);
        assert_eq!(cmd.args()[2], b"key3");
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn module_json_set() {
        let mut bytes = vec![0xF0, 0x00, 0x00, 0x00]; // MODULE, mux=0
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // subcommand JSON/SET
        bytes.extend_from_slice(&[0x00, 0x07]);
        bytes.extend_from_slice(b"profile");
        bytes.extend_from_slice(&[0x00, 0x05]);
        bytes.extend_from_slice(b".name");
        let json_value: &[u8] = b"\"John Doe\"  "; // 12 bytes
        assert_eq!(json_value.len(), 12);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0C]);
        bytes.extend_from_slice(json_value);
        bytes.push(0x00); // flags
        let (cmd, _consumed) = unpack(parse_command(&bytes).unwrap());
        assert_eq!(cmd.opcode, opcodes::OP_MODULE);
        assert_eq!(cmd.module_id, Some(opcodes::module::JSON));
        assert_eq!(cmd.command_id, Some(0x0000));
        assert_eq!(cmd.argc, 3);
    }

    #[test]
    fn resp_passthrough() {
        let resp = b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n";
        let mut bytes = vec![0xFF, 0xFF, 0x00, 0x00];
        bytes.extend_from_slice(&(resp.len() as u32).to_be_bytes());
        bytes.extend_from_slice(resp);
        let (cmd, consumed) = unpack(parse_command(&bytes).unwrap());
        assert_eq!(cmd.opcode, opcodes::OP_RESP_PASSTHROUGH);
        assert_eq!(cmd.resp_data, Some(&resp[..]));
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn truncated_header_is_incomplete() {
        let bytes: &[u8] = &[0x00, 0x00, 0x00];
        match parse_command(bytes).unwrap() {
            ParseOutcome::Incomplete => {}
            other => panic!("expected incomplete, got {other:?}"),
        }
    }

    #[test]
    fn unknown_opcode_is_an_error() {
        let bytes: &[u8] = &[0xBE, 0xEF, 0x00, 0x00];
        assert!(matches!(
            parse_command(bytes),
            Err(RespbError::UnknownOpcode { opcode: 0xBEEF, .. })
        ));
    }

    #[test]
    fn roundtrip_set_through_serializer() {
        let key: &[u8] = b"testkey";
        let value: &[u8] = b"testvalue";
        let mut cmd = Command::new(opcodes::OP_SET, 0x1234);
        cmd.push_arg(key);
        cmd.push_arg(value);
        let mut buf = [0u8; 256];
        let n = serialize_command(&mut buf, &cmd).unwrap();
        let (parsed, consumed) = unpack(parse_command(&buf[..n]).unwrap());
        assert_eq!(consumed, n);
        assert_eq!(parsed.mux_id, 0x1234);
        assert_eq!(parsed.args()[0], key);
        assert_eq!(parsed.args()[1], value);
    }

    #[test]
    fn roundtrip_mget_through_serializer() {
        let mut cmd = Command::new(opcodes::OP_MGET, 7);
        cmd.push_arg(b"a");
        cmd.push_arg(b"bb");
        cmd.push_arg(b"ccc");
        let mut buf = [0u8; 64];
        let n = serialize_command(&mut buf, &cmd).unwrap();
        let (parsed, _) = unpack(parse_command(&buf[..n]).unwrap());
        assert_eq!(parsed.argc, 3);
        assert_eq!(parsed.args()[1], b"bb");
    }

    #[test]
    fn serializer_reports_buffer_too_small() {
        let mut cmd = Command::new(opcodes::OP_GET, 0);
        cmd.push_arg(b"a-key-too-long-for-the-buffer");
        let mut buf = [0u8; 4];
        assert!(matches!(
            serialize_command(&mut buf, &cmd),
            Err(RespbError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn argc_cap_truncates_but_still_consumes_bytes() {
        // A counted list encoding 80 one-byte keys must store only
        // RESPB_MAX_ARGS of them, but must still advance the cursor past
        // the entire declared 80.
        let count: u16 = 80;
        let mut bytes = vec![0x00, 0x0C, 0x00, 0x00]; // MGET
        bytes.extend_from_slice(&count.to_be_bytes());
        for _ in 0..count {
            bytes.extend_from_slice(&[0x00, 0x01, b'x']);
        }
        let (cmd, consumed) = unpack(parse_command(&bytes).unwrap());
        assert_eq!(cmd.argc, RESPB_MAX_ARGS);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn zadd_cursor_advances_past_full_pair_group() {
        // DESIGN.md resolution 3: unlike the reference decoder, this
        // implementation's ZADD walks the whole declared (score, member)
        // group so a second command packed right after it parses cleanly.
        let mut bytes = vec![0x00, 0xC0, 0x00, 0x00]; // ZADD
        bytes.extend_from_slice(&[0x00, 0x03, b'k', b'e', b'y']);
        bytes.push(0x00); // flags
        bytes.extend_from_slice(&2u16.to_be_bytes()); // 2 pairs
        bytes.extend_from_slice(&1u64.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x01, b'a']);
        bytes.extend_from_slice(&2u64.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x01, b'b']);
        let (cmd, consumed) = unpack(parse_command(&bytes).unwrap());
        assert_eq!(cmd.opcode, opcodes::OP_ZADD);
        assert_eq!(consumed, bytes.len());
    }
}
