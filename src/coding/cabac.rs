//! Binary arithmetic coding engine (M-coder with a 9-bit range register).
//!
//! The encoder keeps `low`/`range` registers plus a count of outstanding
//! carry bits; the decoder mirrors it with a 10-bit `offset` register.
//! Range stays in [256, 510] after every renormalization, and the pair
//! maintains `low + range <= 1024` throughout.

use crate::bit_io::{BitInput, BitOutput};
use crate::coding::context::ContextState;
use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};

/// LPS subrange widths, indexed by context state and range quantizer
/// `(range >> 6) & 3`.
pub const RANGE_TAB_LPS: [[u8; 4]; 64] = [
    [128, 176, 208, 240],
    [128, 167, 197, 227],
    [128, 158, 187, 216],
    [123, 150, 178, 205],
    [116, 142, 169, 195],
    [111, 135, 160, 185],
    [105, 128, 152, 175],
    [100, 122, 144, 166],
    [95, 116, 137, 158],
    [90, 110, 130, 150],
    [85, 104, 123, 142],
    [81, 99, 117, 135],
    [77, 94, 111, 128],
    [73, 89, 105, 122],
    [69, 85, 100, 116],
    [66, 80, 95, 110],
    [62, 76, 90, 104],
    [59, 72, 86, 99],
    [56, 69, 81, 94],
    [53, 65, 77, 89],
    [51, 62, 73, 85],
    [48, 59, 69, 80],
    [46, 56, 66, 76],
    [43, 53, 63, 72],
    [41, 50, 59, 69],
    [39, 48, 56, 65],
    [37, 45, 54, 62],
    [35, 43, 51, 59],
    [33, 41, 48, 56],
    [32, 39, 46, 53],
    [30, 37, 43, 50],
    [29, 35, 41, 48],
    [27, 33, 39, 45],
    [26, 31, 37, 43],
    [24, 30, 35, 41],
    [23, 28, 33, 39],
    [22, 27, 32, 37],
    [21, 26, 30, 35],
    [20, 24, 29, 33],
    [19, 23, 27, 31],
    [18, 22, 26, 30],
    [17, 21, 25, 28],
    [16, 20, 23, 27],
    [15, 19, 22, 25],
    [14, 18, 21, 24],
    [14, 17, 20, 23],
    [13, 16, 19, 22],
    [12, 15, 18, 21],
    [12, 14, 17, 20],
    [11, 14, 16, 19],
    [11, 13, 15, 18],
    [10, 12, 15, 17],
    [10, 12, 14, 16],
    [9, 11, 13, 15],
    [9, 11, 12, 14],
    [8, 10, 12, 14],
    [8, 9, 11, 13],
    [7, 9, 11, 12],
    [7, 9, 10, 12],
    [7, 8, 10, 11],
    [6, 8, 9, 11],
    [6, 7, 9, 10],
    [6, 7, 8, 9],
    [2, 2, 2, 2],
];

const QUARTER: u32 = 256;
const HALF: u32 = 512;
const ONE: u32 = 1024;

pub struct BinEncoder {
    low: u32,
    range: u32,
    pending_bits: u32,
    out: BitOutput,
}

impl BinEncoder {
    pub fn new() -> Self {
        Self {
            low: 0,
            range: 510,
            pending_bits: 0,
            out: BitOutput::new(),
        }
    }

    fn put_bit(&mut self, bit: u8) {
        self.out.write_bit(bit);
        while self.pending_bits > 0 {
            self.out.write_bit(1 - bit);
            self.pending_bits -= 1;
        }
    }

    fn renormalize(&mut self) {
        while self.range < QUARTER {
            if self.low < QUARTER {
                self.put_bit(0);
            } else if self.low >= HALF {
                self.put_bit(1);
                self.low -= HALF;
            } else {
                self.pending_bits += 1;
                self.low -= QUARTER;
            }
            self.low <<= 1;
            self.range <<= 1;
        }
    }

    /// Codes one bin against an adaptive context.
    pub fn encode_bin(&mut self, bin: u8, ctx: &mut ContextState) {
        let quant = ((self.range >> 6) & 3) as usize;
        let r_lps = u32::from(RANGE_TAB_LPS[ctx.state() as usize][quant]);
        self.range -= r_lps;
        if bin != ctx.mps() {
            self.low += self.range;
            self.range = r_lps;
        }
        ctx.update(bin);
        self.renormalize();
    }

    /// Codes one bin with fixed one-half probability.
    pub fn encode_bin_bypass(&mut self, bin: u8) {
        self.low <<= 1;
        if bin != 0 {
            self.low += self.range;
        }
        if self.low >= ONE {
            self.put_bit(1);
            self.low -= ONE;
        } else if self.low < HALF {
            self.put_bit(0);
        } else {
            self.pending_bits += 1;
            self.low -= HALF;
        }
    }

    pub fn encode_bins_bypass(&mut self, value: u32, num_bins: u32) {
        for i in (0..num_bins).rev() {
            self.encode_bin_bypass(((value >> i) & 1) as u8);
        }
    }

    /// Codes the termination bin: like `encode_bin` with a fixed LPS
    /// subrange of 2.
    pub fn encode_bin_terminate(&mut self, bin: u8) {
        self.range -= 2;
        if bin != 0 {
            self.low += self.range;
            self.range = 2;
        }
        self.renormalize();
    }

    /// Terminates the stream and returns the byte-aligned payload: one
    /// terminate bin with value 1, the two residual low bits, the trailing
    /// 1-bit marker, then zero padding.
    pub fn flush(mut self) -> DataBlock {
        self.encode_bin_terminate(1);
        let residual_high = ((self.low >> 9) & 1) as u8;
        self.put_bit(residual_high);
        self.out.write_bit(((self.low >> 8) & 1) as u8);
        self.out.write_bit(1);
        self.out.flush();
        self.out.into_block()
    }
}

impl Default for BinEncoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BinDecoder<'a> {
    range: u32,
    offset: u32,
    input: BitInput<'a>,
}

impl<'a> BinDecoder<'a> {
    pub fn new(payload: &'a DataBlock) -> SabacResult<Self> {
        let mut input = BitInput::new(payload);
        let offset = input.read(10)?;
        if offset >= 510 {
            return Err(SabacError::Corrupt(
                "invalid arithmetic coder initialization".into(),
            ));
        }
        Ok(Self {
            range: 510,
            offset,
            input,
        })
    }

    fn renormalize(&mut self) -> SabacResult<()> {
        while self.range < QUARTER {
            self.range <<= 1;
            self.offset = (self.offset << 1) | u32::from(self.input.read_bit()?);
        }
        Ok(())
    }

    pub fn decode_bin(&mut self, ctx: &mut ContextState) -> SabacResult<u8> {
        let quant = ((self.range >> 6) & 3) as usize;
        let r_lps = u32::from(RANGE_TAB_LPS[ctx.state() as usize][quant]);
        self.range -= r_lps;
        let bin = if self.offset >= self.range {
            self.offset -= self.range;
            self.range = r_lps;
            1 - ctx.mps()
        } else {
            ctx.mps()
        };
        ctx.update(bin);
        self.renormalize()?;
        Ok(bin)
    }

    pub fn decode_bin_bypass(&mut self) -> SabacResult<u8> {
        self.offset = (self.offset << 1) | u32::from(self.input.read_bit()?);
        if self.offset >= self.range {
            self.offset -= self.range;
            Ok(1)
        } else {
            Ok(0)
        }
    }

    pub fn decode_bins_bypass(&mut self, num_bins: u32) -> SabacResult<u32> {
        let mut value = 0u32;
        for _ in 0..num_bins {
            value = (value << 1) | u32::from(self.decode_bin_bypass()?);
        }
        Ok(value)
    }

    /// Decodes the termination bin; returns 1 when the stream terminates
    /// here.
    pub fn decode_bin_terminate(&mut self) -> SabacResult<u8> {
        self.range -= 2;
        if self.offset >= self.range {
            Ok(1)
        } else {
            self.renormalize()?;
            Ok(0)
        }
    }
}
