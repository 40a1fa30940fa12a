//! The RESPB serializer: the inverse of `parser::parse_command`.
//!
//! Built fully table-driven over the same opcode shapes the parser
//! recognizes, rather than the reference `respb_serializer.c`'s partial
//! dozen-opcode coverage with a generic fallback — see DESIGN.md
//! resolution 1. `serialize_command` never panics: on insufficient
//! buffer space it returns `Err(RespbError::BufferTooSmall)` and leaves
//! the buffer contents unspecified from that point on, matching the
//! reference's "abort on overflow" contract (SPEC_FULL.md §4.2).

use super::opcodes;
use super::types::{Command, RespbError};

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Writer { buf, pos: 0 }
    }

    fn need(&self, n: usize) -> Result<(), RespbError> {
        if self.pos + n > self.buf.len() {
            Err(RespbError::BufferTooSmall { needed: self.pos + n })
        } else {
            Ok(())
        }
    }

    fn put_u8(&mut self, v: u8) -> Result<(), RespbError> {
        self.need(1)?;
        self.buf[self.pos] = v;
        self.pos += 1;
        Ok(())
    }

    fn put_u16(&mut self, v: u16) -> Result<(), RespbError> {
        self.need(2)?;
        self.buf[self.pos..self.pos + 2].copy_from_slice(&v.to_be_bytes());
        self.pos += 2;
        Ok(())
    }

    fn put_u32(&mut self, v: u32) -> Result<(), RespbError> {
        self.need(4)?;
        self.buf[self.pos..self.pos + 4].copy_from_slice(&v.to_be_bytes());
        self.pos += 4;
        Ok(())
    }

    fn put_u64(&mut self, v: u64) -> Result<(), RespbError> {
        self.need(8)?;
        self.buf[self.pos..self.pos + 8].copy_from_slice(&v.to_be_bytes());
        self.pos += 8;
        Ok(())
    }

    fn put_zeros(&mut self, n: usize) -> Result<(), RespbError> {
        self.need(n)?;
        for i in 0..n {
            self.buf[self.pos + i] = 0;
        }
        self.pos += n;
        Ok(())
    }

    fn put_str2(&mut self, s: &[u8]) -> Result<(), RespbError> {
        self.put_u16(s.len() as u16)?;
        self.need(s.len())?;
        self.buf[self.pos..self.pos + s.len()].copy_from_slice(s);
        self.pos += s.len();
        Ok(())
    }

    fn put_str4(&mut self, s: &[u8]) -> Result<(), RespbError> {
        self.put_u32(s.len() as u32)?;
        self.need(s.len())?;
        self.buf[self.pos..self.pos + s.len()].copy_from_slice(s);
        self.pos += s.len();
        Ok(())
    }
}

/// Serialize `cmd` into `buf`, returning the number of bytes written.
pub fn serialize_command(buf: &mut [u8], cmd: &Command<'_>) -> Result<usize, RespbError> {
    let mut w = Writer::new(buf);
    w.put_u16(cmd.opcode)?;
    w.put_u16(cmd.mux_id)?;

    let args = cmd.args();

    /// Helper: args[i] or an empty slice if the command record doesn't
    /// carry that many arguments (the caller under-specified the record;
    /// we still emit a structurally valid, empty field rather than fail).
    fn arg<'a>(args: &[&'a [u8]], i: usize) -> &'a [u8] {
        args.get(i).copied().unwrap_or(b"")
    }

    fn write_counted_list(w: &mut Writer, args: &[&[u8]]) -> Result<(), RespbError> {
        w.put_u16(args.len() as u16)?;
        for a in args {
            w.put_str2(a)?;
        }
        Ok(())
    }

    fn write_key_prefixed_list(w: &mut Writer, args: &[&[u8]]) -> Result<(), RespbError> {
        w.put_str2(arg(args, 0))?;
        let rest = if args.is_empty() { &args[..] } else { &args[1..] };
        w.put_u16(rest.len() as u16)?;
        for a in rest {
            w.put_str2(a)?;
        }
        Ok(())
    }

    fn write_pair_list(w: &mut Writer, args: &[&[u8]]) -> Result<(), RespbError> {
        let pairs = args.len() / 2;
        w.put_u16(pairs as u16)?;
        for i in 0..pairs {
            w.put_str2(args[i * 2])?;
            w.put_str4(args[i * 2 + 1])?;
        }
        Ok(())
    }

    fn write_key_prefixed_pair_list(w: &mut Writer, args: &[&[u8]]) -> Result<(), RespbError> {
        w.put_str2(arg(args, 0))?;
        let rest = if args.is_empty() { &args[..] } else { &args[1..] };
        let pairs = rest.len() / 2;
        w.put_u16(pairs as u16)?;
        for i in 0..pairs {
            w.put_str2(rest[i * 2])?;
            w.put_str4(rest[i * 2 + 1])?;
        }
        Ok(())
    }

    fn write_key_optional_first(w: &mut Writer, args: &[&[u8]]) -> Result<(), RespbError> {
        w.put_str2(arg(args, 0))?;
        if args.len() > 1 {
            w.put_u16(1)?;
            w.put_str2(args[1])?;
        } else {
            w.put_u16(0)?;
        }
        Ok(())
    }

    match cmd.opcode {
        opcodes::OP_GET | opcodes::OP_DECR | opcodes::OP_GETDEL | opcodes::OP_INCR
        | opcodes::OP_STRLEN => {
            w.put_str2(arg(args, 0))?;
        }
        opcodes::OP_SET => {
            w.put_str2(arg(args, 0))?;
            w.put_str4(arg(args, 1))?;
            w.put_zeros(9)?;
        }
        opcodes::OP_APPEND | opcodes::OP_SETNX | opcodes::OP_GETSET | opcodes::OP_DELIFEQ
        | opcodes::OP_HSETNX => {
            w.put_str2(arg(args, 0))?;
            w.put_str4(arg(args, 1))?;
        }
        opcodes::OP_DECRBY | opcodes::OP_INCRBY => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_GETEX => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
        }
        opcodes::OP_GETRANGE | opcodes::OP_SUBSTR => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(16)?;
        }
        opcodes::OP_INCRBYFLOAT => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_HINCRBYFLOAT => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_MGET | opcodes::OP_DEL | opcodes::OP_EXISTS | opcodes::OP_UNLINK
        | opcodes::OP_SINTER | opcodes::OP_SUNION | opcodes::OP_SDIFF | opcodes::OP_SINTERCARD
        | opcodes::OP_TOUCH | opcodes::OP_WATCH | opcodes::OP_PFCOUNT
        | opcodes::OP_SUBSCRIBE | opcodes::OP_UNSUBSCRIBE | opcodes::OP_PSUBSCRIBE
        | opcodes::OP_PUNSUBSCRIBE | opcodes::OP_SSUBSCRIBE | opcodes::OP_SUNSUBSCRIBE
        | opcodes::OP_ZDIFF | opcodes::OP_ZINTER | opcodes::OP_ZUNION | opcodes::OP_ZINTERCARD => {
            write_counted_list(&mut w, args)?;
        }
        opcodes::OP_MSET | opcodes::OP_MSETNX => {
            write_pair_list(&mut w, args)?;
        }
        opcodes::OP_PSETEX | opcodes::OP_SETEX => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
            w.put_str4(arg(args, 1))?;
        }
        opcodes::OP_SETRANGE => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
            w.put_str4(arg(args, 1))?;
        }
        opcodes::OP_LCS => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_u8(0)?;
        }
        opcodes::OP_LPUSH | opcodes::OP_RPUSH | opcodes::OP_LPUSHX | opcodes::OP_RPUSHX
        | opcodes::OP_SADD | opcodes::OP_SREM | opcodes::OP_SMISMEMBER | opcodes::OP_HMGET
        | opcodes::OP_HDEL | opcodes::OP_ZREM | opcodes::OP_ZMSCORE | opcodes::OP_PFADD
        | opcodes::OP_GEOHASH | opcodes::OP_GEOPOS | opcodes::OP_ZINTERSTORE
        | opcodes::OP_ZUNIONSTORE | opcodes::OP_SINTERSTORE | opcodes::OP_SUNIONSTORE
        | opcodes::OP_SDIFFSTORE | opcodes::OP_ZDIFFSTORE | opcodes::OP_PFMERGE => {
            write_key_prefixed_list(&mut w, args)?;
        }
        opcodes::OP_LPOP | opcodes::OP_RPOP | opcodes::OP_LLEN | opcodes::OP_SMEMBERS
        | opcodes::OP_SCARD | opcodes::OP_SPOP | opcodes::OP_SRANDMEMBER
        | opcodes::OP_HGETALL | opcodes::OP_HKEYS | opcodes::OP_HVALS | opcodes::OP_HLEN
        | opcodes::OP_HRANDFIELD | opcodes::OP_ZCARD | opcodes::OP_ZPOPMIN | opcodes::OP_ZPOPMAX
        | opcodes::OP_ZRANDMEMBER | opcodes::OP_BITCOUNT | opcodes::OP_BITFIELD
        | opcodes::OP_BITFIELD_RO | opcodes::OP_SORT | opcodes::OP_SORT_RO | opcodes::OP_XLEN => {
            w.put_str2(arg(args, 0))?;
        }
        opcodes::OP_LRANGE | opcodes::OP_LTRIM => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(16)?;
        }
        opcodes::OP_LINDEX => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_LSET | opcodes::OP_LREM => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
            w.put_str2(arg(args, 1))?;
        }
        opcodes::OP_LINSERT => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
        }
        opcodes::OP_RPOPLPUSH => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
        }
        opcodes::OP_LMOVE => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(2)?;
        }
        opcodes::OP_BRPOPLPUSH => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_BLMOVE => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(10)?;
        }
        opcodes::OP_LMPOP | opcodes::OP_ZMPOP => {
            w.put_u16(args.len() as u16)?;
            for a in args {
                w.put_str2(a)?;
            }
            w.put_u8(0)?;
        }
        opcodes::OP_BLMPOP | opcodes::OP_BZMPOP => {
            w.put_zeros(8)?;
            w.put_u16(args.len() as u16)?;
            for a in args {
                w.put_str2(a)?;
            }
            w.put_u8(0)?;
        }
        opcodes::OP_LPOS | opcodes::OP_SISMEMBER | opcodes::OP_HGET | opcodes::OP_HEXISTS
        | opcodes::OP_HSTRLEN | opcodes::OP_ZSCORE | opcodes::OP_PFDEBUG | opcodes::OP_XSETID => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
        }
        opcodes::OP_BLPOP | opcodes::OP_BRPOP => {
            w.put_u16(args.len() as u16)?;
            for a in args {
                w.put_str2(a)?;
            }
            w.put_zeros(8)?;
        }
        opcodes::OP_SMOVE => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
        }
        opcodes::OP_SSCAN | opcodes::OP_ZSCAN | opcodes::OP_HSCAN => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_BITOP => {
            w.put_u8(0)?;
            w.put_str2(arg(args, 0))?;
            let rest = if args.is_empty() { &args[..] } else { &args[1..] };
            w.put_u16(rest.len() as u16)?;
            for a in rest {
                w.put_str2(a)?;
            }
        }
        opcodes::OP_ZADD => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
            w.put_u16(0)?;
        }
        opcodes::OP_ZRANGE | opcodes::OP_ZREVRANGE | opcodes::OP_ZRANGEBYSCORE
        | opcodes::OP_ZREVRANGEBYSCORE => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(17)?;
        }
        opcodes::OP_ZRANGEBYLEX | opcodes::OP_ZREVRANGEBYLEX | opcodes::OP_ZREMRANGEBYLEX
        | opcodes::OP_ZLEXCOUNT => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
        }
        opcodes::OP_ZRANGESTORE => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(17)?;
        }
        opcodes::OP_ZCOUNT | opcodes::OP_ZREMRANGEBYRANK | opcodes::OP_ZREMRANGEBYSCORE => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(16)?;
        }
        opcodes::OP_ZINCRBY => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
            w.put_str2(arg(args, 1))?;
        }
        opcodes::OP_ZRANK | opcodes::OP_ZREVRANK => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_u8(0)?;
        }
        opcodes::OP_BZPOPMIN | opcodes::OP_BZPOPMAX => {
            w.put_u16(args.len() as u16)?;
            for a in args {
                w.put_str2(a)?;
            }
            w.put_zeros(8)?;
        }
        opcodes::OP_HSET | opcodes::OP_HMSET => {
            write_key_prefixed_pair_list(&mut w, args)?;
        }
        opcodes::OP_HINCRBY => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_HEXPIRE | opcodes::OP_HEXPIREAT | opcodes::OP_HPEXPIRE
        | opcodes::OP_HPEXPIREAT => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(11)?;
            if args.len() > 1 {
                w.put_str2(args[1])?;
            }
        }
        opcodes::OP_HEXPIRETIME | opcodes::OP_HPEXPIRETIME | opcodes::OP_HPTTL
        | opcodes::OP_HTTL | opcodes::OP_HPERSIST => {
            write_key_optional_first(&mut w, args)?;
        }
        opcodes::OP_HGETEX => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
            if args.len() > 1 {
                w.put_u16(1)?;
                w.put_str2(args[1])?;
            } else {
                w.put_u16(0)?;
            }
        }
        opcodes::OP_HSETEX => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
            if args.len() > 2 {
                w.put_u16(1)?;
                w.put_str2(args[1])?;
                w.put_str4(args[2])?;
            } else {
                w.put_u16(0)?;
            }
        }
        opcodes::OP_SETBIT => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(9)?;
        }
        opcodes::OP_GETBIT => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_BITPOS => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
        }
        opcodes::OP_PFSELFTEST => {}
        opcodes::OP_GEOADD => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
            w.put_u16(0)?;
        }
        opcodes::OP_GEODIST => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
            w.put_u8(0)?;
        }
        opcodes::OP_GEORADIUS | opcodes::OP_GEORADIUS_RO => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(18)?;
        }
        opcodes::OP_GEORADIUSBYMEMBER | opcodes::OP_GEORADIUSBYMEMBER_RO => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(10)?;
        }
        opcodes::OP_GEOSEARCH => {
            w.put_str2(arg(args, 0))?;
            w.put_u8(0)?;
        }
        opcodes::OP_GEOSEARCHSTORE => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_u8(0)?;
        }
        opcodes::OP_XADD => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            if args.len() > 2 {
                w.put_u16(1)?;
                w.put_str2(args[2])?;
            } else {
                w.put_u16(0)?;
            }
        }
        opcodes::OP_XRANGE | opcodes::OP_XREVRANGE => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
        }
        opcodes::OP_XREAD => {
            let pairs = args.len() / 2;
            w.put_u16(pairs as u16)?;
            for i in 0..pairs {
                w.put_str2(args[i * 2])?;
                w.put_str2(args[i * 2 + 1])?;
            }
        }
        opcodes::OP_XREADGROUP => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            let rest = if args.len() > 2 { &args[2..] } else { &[][..] };
            let pairs = rest.len() / 2;
            w.put_u16(pairs as u16)?;
            for i in 0..pairs {
                w.put_str2(rest[i * 2])?;
                w.put_str2(rest[i * 2 + 1])?;
            }
        }
        opcodes::OP_XDEL => {
            w.put_str2(arg(args, 0))?;
            if args.len() > 1 {
                w.put_u16(1)?;
                w.put_str2(args[1])?;
            } else {
                w.put_u16(0)?;
            }
        }
        opcodes::OP_XACK => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            if args.len() > 2 {
                w.put_u16(1)?;
                w.put_str2(args[2])?;
            } else {
                w.put_u16(0)?;
            }
        }
        opcodes::OP_XTRIM => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(10)?;
        }
        opcodes::OP_XPENDING => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
        }
        opcodes::OP_XCLAIM => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
            w.put_zeros(8)?;
            if args.len() > 3 {
                w.put_u16(1)?;
                w.put_str2(args[3])?;
            } else {
                w.put_u16(0)?;
            }
            w.put_u8(0)?;
        }
        opcodes::OP_XAUTOCLAIM => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_str2(arg(args, 2))?;
            w.put_zeros(8)?;
            w.put_str2(arg(args, 3))?;
        }
        opcodes::OP_XINFO | opcodes::OP_XGROUP => {
            w.put_u8(0)?;
            w.put_str2(arg(args, 0))?;
        }
        opcodes::OP_PUBLISH | opcodes::OP_SPUBLISH => {
            w.put_str2(arg(args, 0))?;
            w.put_str4(arg(args, 1))?;
        }
        opcodes::OP_PUBSUB => {
            w.put_u8(0)?;
        }
        opcodes::OP_MULTI | opcodes::OP_EXEC | opcodes::OP_DISCARD | opcodes::OP_UNWATCH => {}
        opcodes::OP_EVAL | opcodes::OP_EVALSHA | opcodes::OP_EVAL_RO | opcodes::OP_EVALSHA_RO
        | opcodes::OP_FCALL | opcodes::OP_FCALL_RO => {
            w.put_str4(arg(args, 0))?;
            let numkeys_max = args.len().saturating_sub(1);
            // reconstruct: args = [script, keys..., maybe first extra arg]
            // we don't know the exact key/arg split from a flat slice, so
            // this mirrors the parser's own lossy contract: everything
            // after the script is treated as keys except, if present, the
            // very last element which is treated as the sole extra arg.
            let (numkeys, extra) = if numkeys_max == 0 {
                (0, None)
            } else {
                (numkeys_max - 1, args.last())
            };
            w.put_u16(numkeys as u16)?;
            for a in &args[1..1 + numkeys] {
                w.put_str2(a)?;
            }
            match extra {
                Some(a) if numkeys_max > 0 => {
                    w.put_u16(1)?;
                    w.put_str2(a)?;
                }
                _ => {
                    w.put_u16(0)?;
                }
            }
        }
        opcodes::OP_SCRIPT | opcodes::OP_FUNCTION => {
            w.put_u8(0)?;
        }
        opcodes::OP_EXPIRE | opcodes::OP_EXPIREAT | opcodes::OP_PEXPIRE
        | opcodes::OP_PEXPIREAT => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(9)?;
        }
        opcodes::OP_TTL | opcodes::OP_PTTL | opcodes::OP_PERSIST | opcodes::OP_TYPE
        | opcodes::OP_EXPIRETIME | opcodes::OP_PEXPIRETIME | opcodes::OP_KEYS
        | opcodes::OP_DUMP => {
            w.put_str2(arg(args, 0))?;
        }
        opcodes::OP_RENAME | opcodes::OP_RENAMENX => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
        }
        opcodes::OP_RANDOMKEY => {}
        opcodes::OP_SCAN => {
            w.put_zeros(8)?;
        }
        opcodes::OP_RESTORE | opcodes::OP_RESTORE_ASKING => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
            w.put_str4(arg(args, 1))?;
            w.put_u8(0)?;
        }
        opcodes::OP_MIGRATE => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(2)?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(2)?;
            w.put_zeros(9)?;
        }
        opcodes::OP_MOVE => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(2)?;
        }
        opcodes::OP_COPY => {
            w.put_str2(arg(args, 0))?;
            w.put_str2(arg(args, 1))?;
            w.put_zeros(3)?;
        }
        opcodes::OP_OBJECT => {
            w.put_u8(0)?;
            w.put_str2(arg(args, 0))?;
        }
        opcodes::OP_WAIT => {
            w.put_zeros(16)?;
        }
        opcodes::OP_WAITAOF => {
            w.put_zeros(24)?;
        }
        opcodes::OP_PING | opcodes::OP_QUIT | opcodes::OP_RESET | opcodes::OP_READONLY
        | opcodes::OP_READWRITE | opcodes::OP_ASKING | opcodes::OP_DBSIZE | opcodes::OP_SAVE
        | opcodes::OP_BGREWRITEAOF | opcodes::OP_LASTSAVE | opcodes::OP_TIME | opcodes::OP_ROLE
        | opcodes::OP_MONITOR | opcodes::OP_SYNC => {}
        opcodes::OP_ECHO | opcodes::OP_AUTH => {
            w.put_str2(arg(args, 0))?;
        }
        opcodes::OP_SELECT => {
            w.put_zeros(2)?;
        }
        opcodes::OP_HELLO => {
            w.put_u8(0)?;
        }
        opcodes::OP_CLIENT | opcodes::OP_CLUSTER => {
            w.put_u8(0)?;
        }
        opcodes::OP_FLUSHDB | opcodes::OP_FLUSHALL | opcodes::OP_BGSAVE | opcodes::OP_SHUTDOWN => {
            w.put_u8(0)?;
        }
        opcodes::OP_INFO | opcodes::OP_REPLCONF | opcodes::OP_LOLWUT => {
            if !args.is_empty() {
                w.put_u16(1)?;
                w.put_str2(args[0])?;
            } else {
                w.put_u16(0)?;
            }
        }
        opcodes::OP_CONFIG | opcodes::OP_COMMAND | opcodes::OP_DEBUG | opcodes::OP_SLOWLOG
        | opcodes::OP_LATENCY | opcodes::OP_MEMORY | opcodes::OP_MODULE_CMD | opcodes::OP_ACL
        | opcodes::OP_COMMANDLOG => {
            w.put_u8(0)?;
        }
        opcodes::OP_REPLICAOF | opcodes::OP_SLAVEOF => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(2)?;
        }
        opcodes::OP_PSYNC => {
            w.put_str2(arg(args, 0))?;
            w.put_zeros(8)?;
        }
        opcodes::OP_FAILOVER => {
            w.put_u8(0)?;
        }
        opcodes::OP_SWAPDB => {
            w.put_zeros(4)?;
        }
        opcodes::OP_MODULE => {
            let module_id = cmd.module_id.unwrap_or(0);
            let command_id = cmd.command_id.unwrap_or(0);
            w.put_u32(((module_id as u32) << 16) | command_id as u32)?;
            match module_id {
                opcodes::module::JSON => match command_id {
                    0x0000 => {
                        w.put_str2(arg(args, 0))?;
                        w.put_str2(arg(args, 1))?;
                        w.put_str4(arg(args, 2))?;
                        w.put_u8(0)?;
                    }
                    0x0001 => {
                        w.put_str2(arg(args, 0))?;
                        let rest = if args.is_empty() { &args[..] } else { &args[1..] };
                        w.put_u16(rest.len() as u16)?;
                        for a in rest {
                            w.put_str2(a)?;
                        }
                    }
                    _ => w.put_str2(arg(args, 0))?,
                },
                opcodes::module::BF => match command_id {
                    0x0000 | 0x0002 => {
                        w.put_str2(arg(args, 0))?;
                        w.put_str2(arg(args, 1))?;
                    }
                    _ => w.put_str2(arg(args, 0))?,
                },
                opcodes::module::FT => match command_id {
                    0x0001 => {
                        w.put_str2(arg(args, 0))?;
                        w.put_str2(arg(args, 1))?;
                    }
                    _ => w.put_str2(arg(args, 0))?,
                },
                _ => w.put_str2(arg(args, 0))?,
            }
        }
        opcodes::OP_RESP_PASSTHROUGH => {
            let payload = cmd.resp_data.unwrap_or(b"");
            w.put_u32(payload.len() as u32)?;
            w.need(payload.len())?;
            w.buf[w.pos..w.pos + payload.len()].copy_from_slice(payload);
            w.pos += payload.len();
        }
        _ => {
            return Err(RespbError::UnknownOpcode { opcode: cmd.opcode, pos: 0 });
        }
    }

    Ok(w.pos)
}
