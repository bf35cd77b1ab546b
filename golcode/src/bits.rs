//! Exponential-Golomb coding primitives and the carry-over bit cache.
//!
//! The cache is a left-adjusted `u64`: the first bit in is the most
//! significant, so full bytes leave from the top while fresh bits enter
//! below them. Code tokens travel as [`BitValue`]s before they enter the
//! cache; the 128-bit value field is what lets the coder represent the
//! 129-bit codeword of `u64::MAX` and the signed fold of `i64::MIN`
//! (which lands on `2^64`).
use crate::{
    error::{unexpected_end_of_stream, value_overflow, ReadResult, WriteResult},
    io::{ByteSink, ByteSource},
};

pub(crate) const CACHE_BITS: u32 = u64::BITS;

/// An encoded token on its way into or out of the bit cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BitValue {
    pub value: u128,
    pub num_bits: u8,
}

const fn exp_golomb(value: u128) -> BitValue {
    let value = value + 1;
    let exponent = u128::BITS - value.leading_zeros() - 1;
    BitValue {
        value,
        num_bits: (exponent * 2 + 1) as u8,
    }
}

/// Code `value` as `exponent` zero bits followed by the `exponent + 1`-bit
/// binary representation of `value + 1`.
pub(crate) const fn encode_exp_golomb(value: u64) -> BitValue {
    exp_golomb(value as u128)
}

/// Fold to non-negative (`x < 0 → -2x`, `x > 0 → 2x - 1`) and code as unsigned.
pub(crate) const fn encode_signed_exp_golomb(value: i64) -> BitValue {
    let folded = if value < 0 {
        (-(value as i128)) as u128 * 2
    } else if value > 0 {
        (value as u128) * 2 - 1
    } else {
        0
    };
    exp_golomb(folded)
}

/// Inverse of [`encode_exp_golomb`]. `code` must carry its marker bit, i.e.
/// be non-zero.
pub(crate) const fn decode_exp_golomb(code: u128) -> u128 {
    code - 1
}

/// Inverse of [`encode_signed_exp_golomb`]. Errors if the folded value lies
/// outside the `i64` range.
pub(crate) fn decode_signed_exp_golomb(code: u128) -> ReadResult<i64> {
    let folded = decode_exp_golomb(code);
    if folded == 0 {
        return Ok(0);
    }
    let magnitude = folded / 2 + (folded & 1);
    if folded & 1 == 0 {
        // even folds are negative
        if magnitude > 1u128 << 63 {
            return Err(value_overflow("i64"));
        }
        Ok((-(magnitude as i128)) as i64)
    } else {
        if magnitude > i64::MAX as u128 {
            return Err(value_overflow("i64"));
        }
        Ok(magnitude as i64)
    }
}

/// Left-adjusted carry-over cache straddling byte boundaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BitCache {
    value: u64,
    used_bits: u8,
}

impl BitCache {
    #[cfg(test)]
    const fn with_state(value: u64, used_bits: u8) -> Self {
        Self { value, used_bits }
    }

    /// Emit every fully occupied high-order byte, MSB first.
    fn flush_full_bytes(&mut self, sink: &mut impl ByteSink) -> WriteResult<()> {
        while self.used_bits >= 8 {
            let byte = (self.value >> (CACHE_BITS - 8)) as u8;
            self.value <<= 8;
            self.used_bits -= 8;
            sink.put(byte)?;
        }
        Ok(())
    }

    /// Push a token into the cache, emitting full bytes as they form.
    ///
    /// Tokens wider than the free cache space are split and written high
    /// half first.
    pub(crate) fn write_bits(
        &mut self,
        sink: &mut impl ByteSink,
        bits: BitValue,
    ) -> WriteResult<()> {
        if bits.num_bits as u32 + self.used_bits as u32 > CACHE_BITS {
            let lower_bits = bits.num_bits / 2;
            let upper = BitValue {
                value: bits.value >> lower_bits,
                num_bits: bits.num_bits - lower_bits,
            };
            self.write_bits(sink, upper)?;
            let lower = BitValue {
                value: bits.value & ((1u128 << lower_bits) - 1),
                num_bits: lower_bits,
            };
            return self.write_bits(sink, lower);
        }
        if bits.num_bits > 0 {
            self.used_bits += bits.num_bits;
            self.value |= (bits.value as u64) << (CACHE_BITS as u8 - self.used_bits);
            self.flush_full_bytes(sink)?;
        }
        Ok(())
    }

    /// Emit whatever remains, zero-padded up to the next byte boundary.
    ///
    /// `write_bits` drains full bytes eagerly, so at most seven bits are
    /// pending here. Flushing an empty cache emits nothing.
    pub(crate) fn flush(&mut self, sink: &mut impl ByteSink) -> WriteResult<()> {
        self.flush_full_bytes(sink)?;
        if self.used_bits > 0 {
            sink.put((self.value >> (CACHE_BITS - 8)) as u8)?;
            self.value = 0;
            self.used_bits = 0;
        }
        Ok(())
    }

    /// Pull one byte from the source into the free low end of the cache.
    ///
    /// Returns `false` when fewer than eight bits are free or the source is
    /// exhausted.
    pub(crate) fn feed_byte(&mut self, source: &mut impl ByteSource) -> ReadResult<bool> {
        if CACHE_BITS - (self.used_bits as u32) < 8 {
            return Ok(false);
        }
        let Some(byte) = source.pull()? else {
            return Ok(false);
        };
        self.value |= (byte as u64) << (CACHE_BITS - self.used_bits as u32 - 8);
        self.used_bits += 8;
        Ok(true)
    }

    /// Read one Exponential-Golomb codeword off the live cache, feeding more
    /// bytes as needed.
    ///
    /// The returned token holds the `exponent + 1` code value bits including
    /// the marker bit. Leading-zero runs longer than the cache are handled by
    /// collecting whole zero bytes before the byte carrying the marker; runs
    /// that imply a value wider than `u64` are rejected.
    pub(crate) fn read_exp_golomb(&mut self, source: &mut impl ByteSource) -> ReadResult<BitValue> {
        let mut leading_zeroes: u32 = 0;
        while self.value == 0 {
            leading_zeroes += self.used_bits as u32;
            self.used_bits = 0;
            if leading_zeroes > CACHE_BITS {
                return Err(value_overflow("u64"));
            }
            if !self.feed_byte(source)? {
                return Err(unexpected_end_of_stream());
            }
        }

        // extract the rest of the zero run; the marker bit is in the cache now
        let exponent = self.value.leading_zeros();
        self.used_bits -= exponent as u8;
        self.value <<= exponent;
        let num_bits = leading_zeroes + exponent + 1;
        if num_bits > CACHE_BITS + 1 {
            return Err(value_overflow("u64"));
        }

        // fill the actual code value bits
        let mut result = BitValue::default();
        while (result.num_bits as u32 + self.used_bits as u32) < num_bits {
            if !self.feed_byte(source)? {
                return Err(unexpected_end_of_stream());
            }
            let needed = num_bits - result.num_bits as u32;
            if self.used_bits as u32 >= CACHE_BITS / 2 && needed > self.used_bits as u32 {
                // drain the cache into the accumulator so further feeds have room
                result.value = (result.value << self.used_bits)
                    | (self.value >> (CACHE_BITS - self.used_bits as u32)) as u128;
                result.num_bits += self.used_bits;
                self.used_bits = 0;
                self.value = 0;
            }
        }

        // extract the remaining bits and realign the cache
        let remaining = num_bits - result.num_bits as u32;
        if result.num_bits > 0 {
            result.value <<= remaining;
        }
        result.value |= (self.value >> (CACHE_BITS - remaining)) as u128;
        result.num_bits += remaining as u8;
        self.used_bits -= remaining as u8;
        self.value = if remaining == CACHE_BITS {
            0
        } else {
            self.value << remaining
        };
        Ok(result)
    }
}
