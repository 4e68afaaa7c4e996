use crate::data_block::{word_mask, DataBlock};

/// In-place differential coding; each word becomes the difference to its
/// predecessor (starting from 0), wrapping in the block's word size.
pub fn forward(block: &mut DataBlock) {
    let mask = word_mask(block.word_size());
    let mut previous = 0u64;
    for i in 0..block.len() {
        let v = block.get(i);
        block.set(i, v.wrapping_sub(previous) & mask);
        previous = v;
    }
}

/// Prefix sum, wrapping in the block's word size.
pub fn inverse(block: &mut DataBlock) {
    let mask = word_mask(block.word_size());
    let mut previous = 0u64;
    for i in 0..block.len() {
        previous = previous.wrapping_add(block.get(i)) & mask;
        block.set(i, previous);
    }
}
