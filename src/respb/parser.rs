//! The RESPB parser: a zero-copy, bounds-checked, stateless decoder.
//!
//! `parse_command` is a pure function of `(buffer)`: it never retains
//! state across calls, and on success or `Incomplete` it never reads past
//! `buffer.len()` (SPEC_FULL.md §8.1 property 1). Every recognized opcode
//! has a dedicated arm transcribed from the reference decoder
//! (`examples/original_source/protocol-bench/src/respb_parser.c`); see
//! DESIGN.md for the handful of opcodes where this implementation
//! deliberately diverges from the reference's literal byte consumption.

use super::io::Cursor;
use super::opcodes::{self, RESPB_MAX_ARGS};
use super::types::{Command, ParseOutcome, RespbError};

/// Parse exactly one RESPB command from the front of `buffer`.
pub fn parse_command(buffer: &[u8]) -> Result<ParseOutcome<'_>, RespbError> {
    let mut c = Cursor::new(buffer);

    macro_rules! need {
        ($e:expr) => {
            match $e {
                Some(v) => v,
                None => return Ok(ParseOutcome::Incomplete),
            }
        };
    }

    let opcode = need!(c.read_u16());
    let mux_id = need!(c.read_u16());
    let mut cmd = Command::new(opcode, mux_id);
    let payload_start = c.pos();

    // ---- repeated-group helpers, shared across many opcodes ----

    /// `u16(count) [str2]*count`, argc = min(count, RESPB_MAX_ARGS).
    fn counted_list<'a>(c: &mut Cursor<'a>, cmd: &mut Command<'a>) -> Option<()> {
        let count = c.read_u16()?;
        for _ in 0..count {
            cmd.push_arg(c.read_str2()?);
        }
        Some(())
    }

    /// `str2(key) u16(count) [str2]*count`, key at args[0], elements at
    /// args[1..], argc = 1 + min(count, RESPB_MAX_ARGS-1).
    fn key_prefixed_list<'a>(c: &mut Cursor<'a>, cmd: &mut Command<'a>) -> Option<()> {
        cmd.push_arg(c.read_str2()?);
        let count = c.read_u16()?;
        for _ in 0..count {
            cmd.push_arg(c.read_str2()?);
        }
        Some(())
    }

    /// `u16(count) [str2 str4]*count`, whole pairs only up to the cap.
    fn pair_list<'a>(c: &mut Cursor<'a>, cmd: &mut Command<'a>) -> Option<()> {
        let count = c.read_u16()? as usize;
        for i in 0..count {
            let k = c.read_str2()?;
            let v = c.read_str4()?;
            if i < RESPB_MAX_ARGS / 2 {
                cmd.push_arg(k);
                cmd.push_arg(v);
            }
        }
        Some(())
    }

    /// `str2(key) u16(count) [str2 str4]*count`, key then whole pairs.
    fn key_prefixed_pair_list<'a>(c: &mut Cursor<'a>, cmd: &mut Command<'a>) -> Option<()> {
        cmd.push_arg(c.read_str2()?);
        let count = c.read_u16()? as usize;
        for i in 0..count {
            let f = c.read_str2()?;
            let v = c.read_str4()?;
            if i < (RESPB_MAX_ARGS - 1) / 2 {
                cmd.push_arg(f);
                cmd.push_arg(v);
            }
        }
        Some(())
    }

    /// `str2(key) u16(count) [if count>0: str2(first)]`, argc = 1 or 2.
    /// Matches the reference's "optional first field" simplification: the
    /// remaining `count-1` elements are declared but not present on the
    /// wire in this encoding (the reference only ever encodes the first),
    /// so there is nothing further to skip.
    fn key_optional_first<'a>(c: &mut Cursor<'a>, cmd: &mut Command<'a>) -> Option<()> {
        cmd.push_arg(c.read_str2()?);
        let count = c.read_u16()?;
        if count > 0 && count < RESPB_MAX_ARGS as u16 {
            cmd.push_arg(c.read_str2()?);
        }
        Some(())
    }

    match opcode {
        // =========================== String ===========================
        opcodes::OP_GET | opcodes::OP_DECR | opcodes::OP_GETDEL | opcodes::OP_INCR
        | opcodes::OP_STRLEN => {
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_SET => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str4()));
            need!(c.skip(1 + 8)); // flags, expiry
        }
        opcodes::OP_APPEND | opcodes::OP_SETNX | opcodes::OP_GETSET | opcodes::OP_DELIFEQ
        | opcodes::OP_HSETNX => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str4()));
        }
        opcodes::OP_DECRBY | opcodes::OP_INCRBY => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_GETEX => {
            cmd.push_arg(need!(c.read_str2()));
            let flags = need!(c.read_u8());
            if flags & 0x01 != 0 {
                need!(c.skip(8));
            }
        }
        opcodes::OP_GETRANGE | opcodes::OP_SUBSTR => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(16));
        }
        opcodes::OP_INCRBYFLOAT | opcodes::OP_HINCRBYFLOAT => {
            cmd.push_arg(need!(c.read_str2()));
            if opcode == opcodes::OP_HINCRBYFLOAT {
                cmd.push_arg(need!(c.read_str2()));
            }
            need!(c.skip(8));
        }
        opcodes::OP_MGET | opcodes::OP_DEL | opcodes::OP_EXISTS | opcodes::OP_UNLINK
        | opcodes::OP_SINTER | opcodes::OP_SUNION | opcodes::OP_SDIFF | opcodes::OP_SINTERCARD
        | opcodes::OP_TOUCH | opcodes::OP_WATCH | opcodes::OP_PFCOUNT
        | opcodes::OP_SUBSCRIBE | opcodes::OP_UNSUBSCRIBE | opcodes::OP_PSUBSCRIBE
        | opcodes::OP_PUNSUBSCRIBE | opcodes::OP_SSUBSCRIBE | opcodes::OP_SUNSUBSCRIBE
        | opcodes::OP_ZDIFF | opcodes::OP_ZINTER | opcodes::OP_ZUNION | opcodes::OP_ZINTERCARD => {
            need!(counted_list(&mut c, &mut cmd));
        }
        opcodes::OP_MSET | opcodes::OP_MSETNX => {
            need!(pair_list(&mut c, &mut cmd));
        }
        opcodes::OP_PSETEX | opcodes::OP_SETEX => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str4()));
        }
        opcodes::OP_SETRANGE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str4()));
        }
        opcodes::OP_LCS => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
        }

        // ============================ List =============================
        opcodes::OP_LPUSH | opcodes::OP_RPUSH | opcodes::OP_LPUSHX | opcodes::OP_RPUSHX
        | opcodes::OP_SADD | opcodes::OP_SREM | opcodes::OP_SMISMEMBER | opcodes::OP_HMGET
        | opcodes::OP_HDEL | opcodes::OP_ZREM | opcodes::OP_ZMSCORE | opcodes::OP_PFADD
        | opcodes::OP_GEOHASH | opcodes::OP_GEOPOS => {
            need!(key_prefixed_list(&mut c, &mut cmd));
        }
        opcodes::OP_LPOP | opcodes::OP_RPOP | opcodes::OP_LLEN | opcodes::OP_SMEMBERS
        | opcodes::OP_SCARD | opcodes::OP_SPOP | opcodes::OP_SRANDMEMBER
        | opcodes::OP_HGETALL | opcodes::OP_HKEYS | opcodes::OP_HVALS | opcodes::OP_HLEN
        | opcodes::OP_HRANDFIELD | opcodes::OP_ZCARD | opcodes::OP_ZPOPMIN | opcodes::OP_ZPOPMAX
        | opcodes::OP_ZRANDMEMBER | opcodes::OP_BITCOUNT | opcodes::OP_BITFIELD
        | opcodes::OP_BITFIELD_RO | opcodes::OP_SORT | opcodes::OP_SORT_RO | opcodes::OP_XLEN => {
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_LRANGE | opcodes::OP_LTRIM => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(16));
        }
        opcodes::OP_LINDEX => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_LSET => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_LREM => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_LINSERT => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_RPOPLPUSH => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_LMOVE => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(2));
        }
        opcodes::OP_BRPOPLPUSH => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_BLMOVE => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(10));
        }
        opcodes::OP_LMPOP | opcodes::OP_ZMPOP => {
            let count = need!(c.read_u16());
            for _ in 0..count {
                cmd.push_arg(need!(c.read_str2()));
            }
            need!(c.skip(1));
        }
        opcodes::OP_BLMPOP | opcodes::OP_BZMPOP => {
            need!(c.skip(8));
            let count = need!(c.read_u16());
            for _ in 0..count {
                cmd.push_arg(need!(c.read_str2()));
            }
            need!(c.skip(1));
        }
        opcodes::OP_LPOS | opcodes::OP_SISMEMBER | opcodes::OP_HGET | opcodes::OP_HEXISTS
        | opcodes::OP_HSTRLEN | opcodes::OP_ZSCORE | opcodes::OP_PFDEBUG | opcodes::OP_XSETID => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_BLPOP | opcodes::OP_BRPOP => {
            let count = need!(c.read_u16());
            for _ in 0..count {
                cmd.push_arg(need!(c.read_str2()));
            }
            need!(c.skip(8));
        }

        // ============================= Set ==============================
        opcodes::OP_SMOVE => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_SSCAN | opcodes::OP_ZSCAN | opcodes::OP_HSCAN => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_SINTERSTORE | opcodes::OP_SUNIONSTORE | opcodes::OP_SDIFFSTORE
        | opcodes::OP_ZDIFFSTORE | opcodes::OP_PFMERGE | opcodes::OP_BITOP => {
            if opcode == opcodes::OP_BITOP {
                need!(c.skip(1));
                cmd.push_arg(need!(c.read_str2()));
                let count = need!(c.read_u16());
                for _ in 0..count {
                    cmd.push_arg(need!(c.read_str2()));
                }
            } else {
                need!(key_prefixed_list(&mut c, &mut cmd));
            }
        }

        // ========================= Sorted Set ===========================
        opcodes::OP_ZADD => {
            // Reference consumes only a fixed 3-byte header (flags+count)
            // and never walks the declared (score, member) pairs, leaving
            // its own cursor short of the real command boundary on any
            // non-empty ZADD. This implementation walks the full declared
            // group so the cursor invariant (SPEC_FULL.md §8.1 property 2)
            // holds; see DESIGN.md resolution 3.
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
            let count = need!(c.read_u16());
            for _ in 0..count {
                need!(c.skip(8));
                c.read_str2();
            }
        }
        opcodes::OP_ZRANGE | opcodes::OP_ZREVRANGE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(17));
        }
        opcodes::OP_ZRANGEBYSCORE | opcodes::OP_ZREVRANGEBYSCORE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(17));
        }
        opcodes::OP_ZRANGEBYLEX | opcodes::OP_ZREVRANGEBYLEX | opcodes::OP_ZREMRANGEBYLEX
        | opcodes::OP_ZLEXCOUNT => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_ZRANGESTORE => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(17));
        }
        opcodes::OP_ZCOUNT | opcodes::OP_ZREMRANGEBYRANK | opcodes::OP_ZREMRANGEBYSCORE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(16));
        }
        opcodes::OP_ZINCRBY => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_ZRANK | opcodes::OP_ZREVRANK => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
        }
        opcodes::OP_BZPOPMIN | opcodes::OP_BZPOPMAX => {
            let count = need!(c.read_u16());
            for _ in 0..count {
                cmd.push_arg(need!(c.read_str2()));
            }
            need!(c.skip(8));
        }
        opcodes::OP_ZINTERSTORE | opcodes::OP_ZUNIONSTORE => {
            need!(key_prefixed_list(&mut c, &mut cmd));
        }

        // =========================== Hash ================================
        opcodes::OP_HSET | opcodes::OP_HMSET => {
            need!(key_prefixed_pair_list(&mut c, &mut cmd));
        }
        opcodes::OP_HINCRBY => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_HEXPIRE | opcodes::OP_HEXPIREAT | opcodes::OP_HPEXPIRE
        | opcodes::OP_HPEXPIREAT => {
            // Always reports argc=2 once a field is present on the wire,
            // regardless of the declared field count — matching the
            // reference's own asymmetry against the HTTL/HPERSIST family
            // below (DESIGN.md resolution 5).
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(11));
            if c.pos() < buffer.len() {
                cmd.push_arg(need!(c.read_str2()));
            }
        }
        opcodes::OP_HEXPIRETIME | opcodes::OP_HPEXPIRETIME | opcodes::OP_HPTTL
        | opcodes::OP_HTTL | opcodes::OP_HPERSIST => {
            need!(key_optional_first(&mut c, &mut cmd));
        }
        opcodes::OP_HGETEX => {
            // The reference's comment claims an optional 8-byte expiry is
            // skipped when present, but the flags byte's presence bit is
            // never actually consulted — this implementation transcribes
            // the reference's real (not commented) byte consumption; see
            // SPEC_FULL.md §9 and DESIGN.md resolution 6.
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
            let count = need!(c.read_u16());
            if count > 0 && count < RESPB_MAX_ARGS as u16 {
                cmd.push_arg(need!(c.read_str2()));
            }
        }
        opcodes::OP_HSETEX => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
            let count = need!(c.read_u16());
            if count > 0 && count < RESPB_MAX_ARGS as u16 {
                cmd.push_arg(need!(c.read_str2()));
                cmd.push_arg(need!(c.read_str4()));
            }
        }

        // ========================== Bitmap ===============================
        opcodes::OP_SETBIT => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(9));
        }
        opcodes::OP_GETBIT => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_BITPOS => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
        }

        // ======================= HyperLogLog =============================
        opcodes::OP_PFSELFTEST => {}

        // ======================= Geospatial ==============================
        opcodes::OP_GEOADD => {
            // Same fixed-skip-without-walking-the-group bug as ZADD in the
            // reference; walked in full here for the same reason
            // (DESIGN.md resolution 3).
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
            let count = need!(c.read_u16());
            for _ in 0..count {
                need!(c.skip(16));
                c.read_str2();
            }
        }
        opcodes::OP_GEODIST => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
        }
        opcodes::OP_GEORADIUS | opcodes::OP_GEORADIUS_RO => {
            // The reference's comment describes skipping coordinates +
            // radius + unit + flags (26 bytes) but the code only skips
            // 18; this matches the reference's actual, executable
            // behavior (DESIGN.md resolution 4).
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(18));
        }
        opcodes::OP_GEORADIUSBYMEMBER | opcodes::OP_GEORADIUSBYMEMBER_RO => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(10));
        }
        opcodes::OP_GEOSEARCH => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
        }
        opcodes::OP_GEOSEARCHSTORE => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(1));
        }

        // =========================== Stream ==============================
        opcodes::OP_XADD => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            let count = need!(c.read_u16());
            if count > 0 {
                cmd.push_arg(need!(c.read_str2()));
            }
        }
        opcodes::OP_XRANGE | opcodes::OP_XREVRANGE => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_XREAD => {
            let numkeys = need!(c.read_u16());
            for _ in 0..numkeys {
                let k = need!(c.read_str2());
                let id = need!(c.read_str2());
                cmd.push_arg(k);
                cmd.push_arg(id);
            }
        }
        opcodes::OP_XREADGROUP => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            let numkeys = need!(c.read_u16());
            for _ in 0..numkeys {
                let k = need!(c.read_str2());
                let id = need!(c.read_str2());
                cmd.push_arg(k);
                cmd.push_arg(id);
            }
        }
        opcodes::OP_XDEL | opcodes::OP_XACK => {
            cmd.push_arg(need!(c.read_str2()));
            if opcode == opcodes::OP_XACK {
                cmd.push_arg(need!(c.read_str2()));
            }
            let count = need!(c.read_u16());
            if count > 0 {
                cmd.push_arg(need!(c.read_str2()));
            }
        }
        opcodes::OP_XTRIM => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(10));
        }
        opcodes::OP_XPENDING => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_XCLAIM => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            let count = need!(c.read_u16());
            if count > 0 {
                cmd.push_arg(need!(c.read_str2()));
            }
            need!(c.skip(1));
        }
        opcodes::OP_XAUTOCLAIM => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_XINFO | opcodes::OP_XGROUP => {
            need!(c.skip(1));
            cmd.push_arg(need!(c.read_str2()));
        }

        // ========================== Pub/Sub ==============================
        opcodes::OP_PUBLISH | opcodes::OP_SPUBLISH => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str4()));
        }
        opcodes::OP_PUBSUB => {
            need!(c.skip(1));
        }

        // ========================= Transaction ===========================
        opcodes::OP_MULTI | opcodes::OP_EXEC | opcodes::OP_DISCARD | opcodes::OP_UNWATCH => {}

        // ===================== Scripting / Functions =====================
        opcodes::OP_EVAL | opcodes::OP_EVALSHA | opcodes::OP_EVAL_RO | opcodes::OP_EVALSHA_RO
        | opcodes::OP_FCALL | opcodes::OP_FCALL_RO => {
            cmd.push_arg(need!(c.read_str4()));
            let numkeys = need!(c.read_u16());
            for _ in 0..numkeys {
                cmd.push_arg(need!(c.read_str2()));
            }
            let numargs = need!(c.read_u16());
            if numargs > 0 {
                cmd.push_arg(need!(c.read_str2()));
            }
        }
        opcodes::OP_SCRIPT | opcodes::OP_FUNCTION => {
            need!(c.skip(1));
        }

        // ========================= Generic Key ============================
        opcodes::OP_EXPIRE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(9));
        }
        opcodes::OP_EXPIREAT | opcodes::OP_PEXPIRE | opcodes::OP_PEXPIREAT => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(9));
        }
        opcodes::OP_TTL | opcodes::OP_PTTL | opcodes::OP_PERSIST | opcodes::OP_TYPE
        | opcodes::OP_EXPIRETIME | opcodes::OP_PEXPIRETIME | opcodes::OP_KEYS
        | opcodes::OP_DUMP => {
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_RENAME | opcodes::OP_RENAMENX => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_RANDOMKEY => {}
        opcodes::OP_SCAN => {
            need!(c.skip(8));
        }
        opcodes::OP_RESTORE | opcodes::OP_RESTORE_ASKING => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
            cmd.push_arg(need!(c.read_str4()));
            need!(c.skip(1));
        }
        opcodes::OP_MIGRATE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(2));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(2));
            need!(c.skip(9));
        }
        opcodes::OP_MOVE => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(2));
        }
        opcodes::OP_COPY => {
            cmd.push_arg(need!(c.read_str2()));
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(3));
        }
        opcodes::OP_OBJECT => {
            need!(c.skip(1));
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_WAIT => {
            need!(c.skip(16));
        }
        opcodes::OP_WAITAOF => {
            need!(c.skip(24));
        }

        // ========================= Connection =============================
        opcodes::OP_PING | opcodes::OP_QUIT | opcodes::OP_RESET | opcodes::OP_READONLY
        | opcodes::OP_READWRITE | opcodes::OP_ASKING | opcodes::OP_DBSIZE | opcodes::OP_SAVE
        | opcodes::OP_BGREWRITEAOF | opcodes::OP_LASTSAVE | opcodes::OP_TIME | opcodes::OP_ROLE
        | opcodes::OP_MONITOR | opcodes::OP_SYNC => {}
        opcodes::OP_ECHO => {
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_AUTH => {
            cmd.push_arg(need!(c.read_str2()));
        }
        opcodes::OP_SELECT => {
            need!(c.skip(2));
        }
        opcodes::OP_HELLO => {
            need!(c.skip(1));
        }
        opcodes::OP_CLIENT | opcodes::OP_CLUSTER => {
            need!(c.skip(1));
        }

        // ========================== Server ================================
        opcodes::OP_FLUSHDB | opcodes::OP_FLUSHALL => {
            need!(c.skip(1));
        }
        opcodes::OP_BGSAVE | opcodes::OP_SHUTDOWN => {
            need!(c.skip(1));
        }
        opcodes::OP_INFO | opcodes::OP_REPLCONF | opcodes::OP_LOLWUT => {
            need!(key_optional_head(&mut c, &mut cmd));
        }
        opcodes::OP_CONFIG | opcodes::OP_COMMAND | opcodes::OP_DEBUG | opcodes::OP_SLOWLOG
        | opcodes::OP_LATENCY | opcodes::OP_MEMORY | opcodes::OP_MODULE_CMD | opcodes::OP_ACL
        | opcodes::OP_COMMANDLOG => {
            need!(c.skip(1));
        }
        opcodes::OP_REPLICAOF | opcodes::OP_SLAVEOF => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(2));
        }
        opcodes::OP_PSYNC => {
            cmd.push_arg(need!(c.read_str2()));
            need!(c.skip(8));
        }
        opcodes::OP_FAILOVER => {
            need!(c.skip(1));
        }
        opcodes::OP_SWAPDB => {
            need!(c.skip(4));
        }

        // ===================== Module extension frame =====================
        opcodes::OP_MODULE => {
            let subcommand = need!(c.read_u32());
            let module_id = (subcommand >> 16) as u16;
            let command_id = (subcommand & 0xFFFF) as u16;
            cmd.module_id = Some(module_id);
            cmd.command_id = Some(command_id);
            match module_id {
                opcodes::module::JSON => match command_id {
                    0x0000 => {
                        // JSON.SET key path json [flags]
                        cmd.push_arg(need!(c.read_str2()));
                        cmd.push_arg(need!(c.read_str2()));
                        cmd.push_arg(need!(c.read_str4()));
                        need!(c.skip(1));
                    }
                    0x0001 => {
                        // JSON.GET key [paths...]
                        cmd.push_arg(need!(c.read_str2()));
                        let numpaths = need!(c.read_u16());
                        for _ in 0..numpaths {
                            cmd.push_arg(need!(c.read_str2()));
                        }
                    }
                    _ => cmd.push_arg(need!(c.read_str2())),
                },
                opcodes::module::BF => match command_id {
                    0x0000 | 0x0002 => {
                        cmd.push_arg(need!(c.read_str2()));
                        cmd.push_arg(need!(c.read_str2()));
                    }
                    _ => cmd.push_arg(need!(c.read_str2())),
                },
                opcodes::module::FT => match command_id {
                    0x0001 => {
                        cmd.push_arg(need!(c.read_str2()));
                        cmd.push_arg(need!(c.read_str2()));
                    }
                    _ => cmd.push_arg(need!(c.read_str2())),
                },
                _ => cmd.push_arg(need!(c.read_str2())),
            }
        }

        // ====================== RESP passthrough frame =====================
        opcodes::OP_RESP_PASSTHROUGH => {
            let resp_length = need!(c.read_u32()) as usize;
            let start = c.pos();
            need!(c.skip(resp_length));
            cmd.resp_data = Some(c.slice_from(start));
        }

        _ => {
            return Err(RespbError::UnknownOpcode {
                opcode,
                pos: payload_start,
            });
        }
    }

    cmd.raw_payload = c.slice_from(payload_start);
    let consumed = c.pos();
    Ok(ParseOutcome::Complete(cmd, consumed))
}

/// `u16(count) [if count>0: str2(first)]`, argc = count>0 ? 1 : 0. Used by
/// `INFO`, `REPLCONF`, `LOLWUT`, whose only encoded element (if any) is the
/// first.
fn key_optional_head<'a>(c: &mut Cursor<'a>, cmd: &mut Command<'a>) -> Option<()> {
    let count = c.read_u16()?;
    if count > 0 && count < RESPB_MAX_ARGS as u16 {
        cmd.push_arg(c.read_str2()?);
    }
    Some(())
}
