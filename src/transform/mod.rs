//! Reversible stream transforms. The forward direction expands a
//! one-element stream vector into the transform's output streams; the
//! inverse collapses them back into the original block.

pub mod diff;
pub mod equality;
pub mod lut;
pub mod match_coding;
pub mod rle;

use serde::{Deserialize, Serialize};

use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformId {
    NoTransform,
    EqualityCoding,
    MatchCoding,
    RleCoding,
    LutCoding,
    DiffCoding,
}

/// One output stream of a transform. A word size of 0 inherits the input
/// block's word size.
#[derive(Debug, Clone, Copy)]
pub struct StreamDescriptor {
    pub name: &'static str,
    pub word_size: usize,
}

const fn stream(name: &'static str, word_size: usize) -> StreamDescriptor {
    StreamDescriptor { name, word_size }
}

const NO_TRANSFORM_STREAMS: [StreamDescriptor; 1] = [stream("out", 0)];
const EQUALITY_STREAMS: [StreamDescriptor; 2] = [stream("raw_symbols", 0), stream("eq_flags", 1)];
const MATCH_STREAMS: [StreamDescriptor; 3] = [
    stream("raw_values", 0),
    stream("pointers", 4),
    stream("lengths", 4),
];
const RLE_STREAMS: [StreamDescriptor; 2] = [stream("raw_values", 0), stream("lengths", 1)];
const LUT_STREAMS: [StreamDescriptor; 3] =
    [stream("sequence", 0), stream("lut0", 0), stream("lut1", 0)];
const DIFF_STREAMS: [StreamDescriptor; 1] = [stream("sequence", 0)];

impl TransformId {
    pub fn name(&self) -> &'static str {
        match self {
            TransformId::NoTransform => "no_transform",
            TransformId::EqualityCoding => "equality_coding",
            TransformId::MatchCoding => "match_coding",
            TransformId::RleCoding => "rle_coding",
            TransformId::LutCoding => "lut_coding",
            TransformId::DiffCoding => "diff_coding",
        }
    }

    pub fn streams(&self) -> &'static [StreamDescriptor] {
        match self {
            TransformId::NoTransform => &NO_TRANSFORM_STREAMS,
            TransformId::EqualityCoding => &EQUALITY_STREAMS,
            TransformId::MatchCoding => &MATCH_STREAMS,
            TransformId::RleCoding => &RLE_STREAMS,
            TransformId::LutCoding => &LUT_STREAMS,
            TransformId::DiffCoding => &DIFF_STREAMS,
        }
    }

    pub fn parameter_count(&self) -> usize {
        match self {
            TransformId::MatchCoding | TransformId::RleCoding | TransformId::LutCoding => 1,
            _ => 0,
        }
    }

    pub fn validate_parameters(&self, parameters: &[u64]) -> SabacResult<()> {
        if parameters.len() != self.parameter_count() {
            return Err(SabacError::InvalidInput(format!(
                "{} takes {} parameter(s), got {}",
                self.name(),
                self.parameter_count(),
                parameters.len()
            )));
        }
        match self {
            TransformId::RleCoding => {
                let guard = parameters[0];
                if !(1..=254).contains(&guard) {
                    return Err(SabacError::InvalidInput(format!(
                        "rle_coding guard {} outside [1, 254]",
                        guard
                    )));
                }
            }
            TransformId::MatchCoding => {
                let window = parameters[0];
                if window == 0 || window > u64::from(u32::MAX) {
                    return Err(SabacError::InvalidInput(format!(
                        "match_coding window {} outside [1, 2^32 - 1]",
                        window
                    )));
                }
            }
            TransformId::LutCoding => {
                let order = parameters[0];
                if order > 1 {
                    return Err(SabacError::Unsupported(format!(
                        "lut_coding order {} (supported: 0 and 1)",
                        order
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Applies the forward transform in place; `streams` enters with the input
/// block alone and leaves with the transform's streams in descriptor order.
pub fn forward(
    id: TransformId,
    parameters: &[u64],
    streams: &mut Vec<DataBlock>,
) -> SabacResult<()> {
    debug_assert_eq!(streams.len(), 1);
    id.validate_parameters(parameters)?;
    match id {
        TransformId::NoTransform => {}
        TransformId::EqualityCoding => {
            let mut flags = DataBlock::new(0, 1)?;
            equality::forward(&mut streams[0], &mut flags)?;
            streams.push(flags);
        }
        TransformId::MatchCoding => {
            let mut pointers = DataBlock::new(0, 4)?;
            let mut lengths = DataBlock::new(0, 4)?;
            match_coding::forward(parameters[0], &mut streams[0], &mut pointers, &mut lengths)?;
            streams.push(pointers);
            streams.push(lengths);
        }
        TransformId::RleCoding => {
            let mut lengths = DataBlock::new(0, 1)?;
            rle::forward(parameters[0], &mut streams[0], &mut lengths)?;
            streams.push(lengths);
        }
        TransformId::LutCoding => {
            let word_size = streams[0].word_size();
            let mut lut0 = DataBlock::new(0, word_size)?;
            let mut lut1 = DataBlock::new(0, word_size)?;
            lut::forward(parameters[0], &mut streams[0], &mut lut0, &mut lut1)?;
            streams.push(lut0);
            streams.push(lut1);
        }
        TransformId::DiffCoding => diff::forward(&mut streams[0]),
    }
    Ok(())
}

/// Applies the inverse transform and collapses `streams` back to one block.
pub fn inverse(
    id: TransformId,
    parameters: &[u64],
    streams: &mut Vec<DataBlock>,
) -> SabacResult<()> {
    id.validate_parameters(parameters)?;
    if streams.len() != id.streams().len() {
        return Err(SabacError::Corrupt(format!(
            "{} expects {} streams, got {}",
            id.name(),
            id.streams().len(),
            streams.len()
        )));
    }
    match id {
        TransformId::NoTransform => {}
        TransformId::EqualityCoding => {
            let (values, rest) = streams.split_at_mut(1);
            equality::inverse(&mut values[0], &rest[0])?;
        }
        TransformId::MatchCoding => {
            let (values, rest) = streams.split_at_mut(1);
            match_coding::inverse(&mut values[0], &rest[0], &rest[1])?;
        }
        TransformId::RleCoding => {
            let (values, rest) = streams.split_at_mut(1);
            rle::inverse(parameters[0], &mut values[0], &rest[0])?;
        }
        TransformId::LutCoding => {
            let (values, rest) = streams.split_at_mut(1);
            lut::inverse(parameters[0], &mut values[0], &rest[0], &rest[1])?;
        }
        TransformId::DiffCoding => diff::inverse(&mut streams[0]),
    }
    streams.truncate(1);
    Ok(())
}
