use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};

const MIN_MATCH_LEN: usize = 2;

/// Window-limited match coding. For each position the longest match inside
/// the trailing window is emitted as (pointer, length); ties resolve to the
/// smallest pointer. Positions without a usable match (length < 2) emit a
/// zero pointer/length pair and the literal symbol. Matches may overlap
/// their own output.
pub fn forward(
    window: u64,
    values: &mut DataBlock,
    pointers: &mut DataBlock,
    lengths: &mut DataBlock,
) -> SabacResult<()> {
    debug_assert!(window >= 1);
    let window = usize::try_from(window).unwrap_or(usize::MAX);
    let n = values.len();
    let mut raw = DataBlock::new(0, values.word_size())?;

    let mut i = 0usize;
    while i < n {
        let start = i.saturating_sub(window);
        let mut best_len = 0usize;
        let mut best_ptr = 0usize;
        // Nearest candidates first, so equal lengths keep the smallest
        // pointer.
        for j in (start..i).rev() {
            let mut len = 0usize;
            while i + len < n && values.get(j + len) == values.get(i + len) {
                len += 1;
            }
            if len > best_len {
                best_len = len;
                best_ptr = i - j;
            }
        }
        if best_len >= MIN_MATCH_LEN {
            pointers.push(best_ptr as u64);
            lengths.push(best_len as u64);
            i += best_len;
        } else {
            pointers.push(0);
            lengths.push(0);
            raw.push(values.get(i));
            i += 1;
        }
    }
    values.swap(&mut raw);
    Ok(())
}

pub fn inverse(
    values: &mut DataBlock,
    pointers: &DataBlock,
    lengths: &DataBlock,
) -> SabacResult<()> {
    if pointers.len() != lengths.len() {
        return Err(SabacError::Corrupt(
            "match pointer and length streams disagree".into(),
        ));
    }
    let mut out = DataBlock::new(0, values.word_size())?;
    {
        let mut raw = values.stepper();
        for k in 0..pointers.len() {
            let pointer = pointers.get(k) as usize;
            let length = lengths.get(k) as usize;
            if length == 0 {
                if pointer != 0 {
                    return Err(SabacError::Corrupt("match pointer without length".into()));
                }
                if !raw.is_valid() {
                    return Err(SabacError::Corrupt("match raw values underflow".into()));
                }
                out.push(raw.get());
                raw.inc();
            } else {
                if length < MIN_MATCH_LEN {
                    return Err(SabacError::Corrupt("match length below minimum".into()));
                }
                if pointer == 0 || pointer > out.len() {
                    return Err(SabacError::Corrupt("match pointer out of window".into()));
                }
                let from = out.len() - pointer;
                for t in 0..length {
                    let v = out.get(from + t);
                    out.push(v);
                }
            }
        }
        if raw.is_valid() {
            return Err(SabacError::Corrupt("unconsumed match raw values".into()));
        }
    }
    values.swap(&mut out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_of(words: &[u64], word_size: usize) -> DataBlock {
        let mut block = DataBlock::new(0, word_size).unwrap();
        for &w in words {
            block.push(w);
        }
        block
    }

    fn collect(block: &DataBlock) -> Vec<u64> {
        (0..block.len()).map(|i| block.get(i)).collect()
    }

    fn run_forward(words: &[u64], window: u64) -> (Vec<u64>, Vec<u64>, Vec<u64>) {
        let mut values = block_of(words, 1);
        let mut pointers = DataBlock::new(0, 4).unwrap();
        let mut lengths = DataBlock::new(0, 4).unwrap();
        forward(window, &mut values, &mut pointers, &mut lengths).unwrap();
        (collect(&values), collect(&pointers), collect(&lengths))
    }

    #[test]
    fn test_overlapping_match() {
        let (raw, pointers, lengths) = run_forward(&[1, 2, 3, 1, 2, 3, 1, 2, 3], 16);
        assert_eq!(raw, vec![1, 2, 3]);
        assert_eq!(pointers, vec![0, 0, 0, 3]);
        assert_eq!(lengths, vec![0, 0, 0, 6]);
    }

    #[test]
    fn test_tie_breaks_to_smallest_pointer() {
        // Both distance 3 and distance 4 give a length-2 match of [8, 8].
        let (raw, pointers, lengths) = run_forward(&[8, 8, 8, 9, 8, 8], 16);
        assert_eq!(raw, vec![8, 9]);
        assert_eq!(pointers, vec![0, 1, 0, 3]);
        assert_eq!(lengths, vec![0, 2, 0, 2]);
    }

    #[test]
    fn test_window_limits_search() {
        // The repeat lies 4 positions back, outside a window of 2.
        let (raw, pointers, _) = run_forward(&[1, 2, 9, 8, 1, 2], 2);
        assert_eq!(raw, vec![1, 2, 9, 8, 1, 2]);
        assert!(pointers.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_roundtrip() {
        let inputs: Vec<Vec<u64>> = vec![
            vec![],
            vec![1],
            vec![1, 2, 3, 1, 2, 3, 1, 2, 3],
            vec![0; 64],
            vec![1, 2, 1, 2, 5, 1, 2, 1, 2, 5, 9],
            (0..100).map(|i| i % 7).collect(),
        ];
        for window in [1u64, 4, 16, 1024] {
            for words in &inputs {
                let original = block_of(words, 1);
                let mut values = original.clone();
                let mut pointers = DataBlock::new(0, 4).unwrap();
                let mut lengths = DataBlock::new(0, 4).unwrap();
                forward(window, &mut values, &mut pointers, &mut lengths).unwrap();
                inverse(&mut values, &pointers, &lengths).unwrap();
                assert_eq!(values, original, "window {} input {:?}", window, words);
            }
        }
    }

    #[test]
    fn test_inverse_rejects_bad_pointer() {
        let mut values = block_of(&[], 1);
        let pointers = block_of(&[5], 4);
        let lengths = block_of(&[3], 4);
        assert!(inverse(&mut values, &pointers, &lengths).is_err());
    }
}
