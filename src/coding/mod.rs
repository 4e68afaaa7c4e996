//! Per-stream symbol coding: binarization bins routed through the CABAC
//! engine under a context selection mode.

pub mod binarization;
pub mod cabac;
pub mod context;

pub use binarization::{BinGet, BinPut, Binarization, BinarizationId};
pub use cabac::{BinDecoder, BinEncoder};
pub use context::{ContextSelection, ContextState};

use crate::bit_io::BitOutput;
use crate::data_block::{sign_extend, DataBlock};
use crate::error::{SabacError, SabacResult};

/// Payload of a stream with no symbols: just the 1-bit marker, zero-padded.
pub const TERMINATION_BYTE: u8 = 0x80;

struct SymbolWriter {
    engine: BinEncoder,
    contexts: Vec<ContextState>,
    mode: ContextSelection,
}

impl BinPut for SymbolWriter {
    fn put(&mut self, bin: u8, bin_idx: u32) -> SabacResult<()> {
        match self.mode {
            ContextSelection::Bypass => self.engine.encode_bin_bypass(bin),
            mode => {
                let ctx = &mut self.contexts[mode.context_index(bin_idx)];
                self.engine.encode_bin(bin, ctx);
            }
        }
        Ok(())
    }
}

struct SymbolReader<'a> {
    engine: BinDecoder<'a>,
    contexts: Vec<ContextState>,
    mode: ContextSelection,
}

impl BinGet for SymbolReader<'_> {
    fn get(&mut self, bin_idx: u32) -> SabacResult<u8> {
        match self.mode {
            ContextSelection::Bypass => self.engine.decode_bin_bypass(),
            mode => {
                let ctx = &mut self.contexts[mode.context_index(bin_idx)];
                self.engine.decode_bin(ctx)
            }
        }
    }
}

/// Binarizes and arithmetic-codes every word of `block` into a byte-aligned
/// payload. Symbols must already be validated against the binarization's
/// range.
pub fn encode_stream(
    block: &DataBlock,
    binarization: Binarization,
    mode: ContextSelection,
) -> SabacResult<DataBlock> {
    if block.is_empty() {
        let mut out = BitOutput::new();
        out.write_bit(1);
        out.flush();
        return Ok(out.into_block());
    }

    let mut writer = SymbolWriter {
        engine: BinEncoder::new(),
        contexts: vec![ContextState::new(); mode.context_count()],
        mode,
    };
    let signed = binarization.is_signed();
    let word_size = block.word_size();
    let mut stepper = block.stepper();
    while stepper.is_valid() {
        let word = stepper.get();
        let symbol = if signed {
            sign_extend(word, word_size) as u64
        } else {
            word
        };
        binarization.encode_symbol(symbol, &mut writer)?;
        stepper.inc();
    }
    Ok(writer.engine.flush())
}

/// Decodes `num_symbols` words from a CABAC payload and verifies the
/// stream termination.
pub fn decode_stream(
    payload: &DataBlock,
    num_symbols: usize,
    binarization: Binarization,
    mode: ContextSelection,
    word_size: usize,
) -> SabacResult<DataBlock> {
    if num_symbols == 0 {
        if payload.len() != 1 || payload.get(0) != u64::from(TERMINATION_BYTE) {
            return Err(SabacError::Corrupt("bad termination of empty stream".into()));
        }
        return DataBlock::new(0, word_size);
    }

    let mut reader = SymbolReader {
        engine: BinDecoder::new(payload)?,
        contexts: vec![ContextState::new(); mode.context_count()],
        mode,
    };
    let mut out = DataBlock::with_capacity(num_symbols, word_size)?;
    for _ in 0..num_symbols {
        let symbol = binarization.decode_symbol(&mut reader)?;
        out.push(symbol);
    }
    if reader.engine.decode_bin_terminate()? != 1 {
        return Err(SabacError::Corrupt("missing stream termination".into()));
    }
    Ok(out)
}
