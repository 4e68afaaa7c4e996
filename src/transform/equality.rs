use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};

/// Splits the input into non-repeated symbols and an equality flag stream.
/// A symbol equal to its predecessor emits flag 1 and nothing else; a new
/// symbol emits flag 0 and the symbol shifted down by one when it lies
/// above the predecessor (the "equal" value cannot occur, so the alphabet
/// closes the gap). The predecessor starts at 0 for the first position.
pub fn forward(values: &mut DataBlock, flags: &mut DataBlock) -> SabacResult<()> {
    let mut raw = DataBlock::new(0, values.word_size())?;
    let mut previous = 0u64;
    let mut stepper = values.stepper();
    while stepper.is_valid() {
        let v = stepper.get();
        if v == previous {
            flags.push(1);
        } else {
            flags.push(0);
            raw.push(if previous > v { v } else { v - 1 });
            previous = v;
        }
        stepper.inc();
    }
    values.swap(&mut raw);
    Ok(())
}

pub fn inverse(values: &mut DataBlock, flags: &DataBlock) -> SabacResult<()> {
    let mut out = DataBlock::new(0, values.word_size())?;
    let mut previous = 0u64;
    {
        let mut raw = values.stepper();
        let mut flag = flags.stepper();
        while flag.is_valid() {
            if flag.get() != 0 {
                out.push(previous);
            } else {
                if !raw.is_valid() {
                    return Err(SabacError::Corrupt("equality raw symbols underflow".into()));
                }
                let w = raw.get();
                raw.inc();
                let v = if w < previous { w } else { w + 1 };
                out.push(v);
                previous = v;
            }
            flag.inc();
        }
        if raw.is_valid() {
            return Err(SabacError::Corrupt("unconsumed equality raw symbols".into()));
        }
    }
    values.swap(&mut out);
    Ok(())
}
