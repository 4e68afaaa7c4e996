use std::collections::HashMap;

use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};

/// Replaces each symbol with its index in a frequency-sorted lookup table.
/// `lut0` carries the alphabet in descending frequency order (ties to the
/// ascending symbol value). With order 1, `lut1` carries one row per
/// conditioning symbol (in `lut0` order), each row the alphabet re-sorted
/// by conditional frequency; the first symbol of the sequence stays
/// order-0 coded.
pub fn forward(
    order: u64,
    values: &mut DataBlock,
    lut0: &mut DataBlock,
    lut1: &mut DataBlock,
) -> SabacResult<()> {
    debug_assert!(order <= 1);
    let n = values.len();
    let mut sequence = DataBlock::new(0, values.word_size())?;

    let mut freq: HashMap<u64, u64> = HashMap::new();
    for i in 0..n {
        *freq.entry(values.get(i)).or_insert(0) += 1;
    }
    let mut alphabet: Vec<u64> = freq.keys().copied().collect();
    alphabet.sort_by(|a, b| freq[b].cmp(&freq[a]).then(a.cmp(b)));
    let index0: HashMap<u64, u64> = alphabet
        .iter()
        .enumerate()
        .map(|(i, &sym)| (sym, i as u64))
        .collect();
    for &sym in &alphabet {
        lut0.push(sym);
    }

    if order == 0 {
        for i in 0..n {
            sequence.push(index0[&values.get(i)]);
        }
    } else {
        let size = alphabet.len();
        let mut cond: Vec<HashMap<u64, u64>> = vec![HashMap::new(); size];
        for i in 1..n {
            let ctx = index0[&values.get(i - 1)] as usize;
            *cond[ctx].entry(values.get(i)).or_insert(0) += 1;
        }
        let mut row_index: Vec<HashMap<u64, u64>> = Vec::with_capacity(size);
        for ctx_freq in &cond {
            let mut row = alphabet.clone();
            row.sort_by(|a, b| {
                let fa = ctx_freq.get(a).copied().unwrap_or(0);
                let fb = ctx_freq.get(b).copied().unwrap_or(0);
                fb.cmp(&fa).then(a.cmp(b))
            });
            for &sym in &row {
                lut1.push(sym);
            }
            row_index.push(
                row.iter()
                    .enumerate()
                    .map(|(i, &sym)| (sym, i as u64))
                    .collect(),
            );
        }
        if n > 0 {
            sequence.push(index0[&values.get(0)]);
            for i in 1..n {
                let ctx = index0[&values.get(i - 1)] as usize;
                sequence.push(row_index[ctx][&values.get(i)]);
            }
        }
    }
    values.swap(&mut sequence);
    Ok(())
}

pub fn inverse(
    order: u64,
    values: &mut DataBlock,
    lut0: &DataBlock,
    lut1: &DataBlock,
) -> SabacResult<()> {
    let size = lut0.len();
    let alphabet: Vec<u64> = (0..size).map(|i| lut0.get(i)).collect();
    let n = values.len();
    if n > 0 && size == 0 {
        return Err(SabacError::Corrupt("empty lookup table".into()));
    }
    let mut out = DataBlock::new(0, values.word_size())?;

    if order == 0 {
        for i in 0..n {
            let idx = values.get(i) as usize;
            if idx >= size {
                return Err(SabacError::Corrupt("lookup index out of range".into()));
            }
            out.push(alphabet[idx]);
        }
    } else {
        if lut1.len() != size * size {
            return Err(SabacError::Corrupt("conditional lookup table size".into()));
        }
        let index0: HashMap<u64, u64> = alphabet
            .iter()
            .enumerate()
            .map(|(i, &sym)| (sym, i as u64))
            .collect();
        let mut previous = 0u64;
        for i in 0..n {
            let idx = values.get(i) as usize;
            if idx >= size {
                return Err(SabacError::Corrupt("lookup index out of range".into()));
            }
            let sym = if i == 0 {
                alphabet[idx]
            } else {
                let ctx = index0[&previous] as usize;
                lut1.get(ctx * size + idx)
            };
            if !index0.contains_key(&sym) {
                return Err(SabacError::Corrupt("conditional table symbol".into()));
            }
            out.push(sym);
            previous = sym;
        }
    }
    values.swap(&mut out);
    Ok(())
}
