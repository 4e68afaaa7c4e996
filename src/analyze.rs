//! Bounded configuration search: encode a leading sample under a fixed
//! candidate grid and keep the smallest output. A full parameter-space
//! exploration lives outside the codec.

use crate::coding::{BinarizationId, ContextSelection};
use crate::config::{EncodingConfig, StreamConfig};
use crate::data_block::DataBlock;
use crate::encode::encode;
use crate::error::{SabacError, SabacResult};
use crate::transform::{self, TransformId};

const CANDIDATE_TRANSFORMS: [(TransformId, &[u64]); 5] = [
    (TransformId::NoTransform, &[]),
    (TransformId::DiffCoding, &[]),
    (TransformId::EqualityCoding, &[]),
    (TransformId::RleCoding, &[254]),
    (TransformId::LutCoding, &[0]),
];

const CANDIDATE_MODES: [ContextSelection; 3] = [
    ContextSelection::Bypass,
    ContextSelection::Adaptive,
    ContextSelection::BiAdaptive,
];

/// Searches the candidate grid on a sample of up to `block_size` leading
/// words and returns the configuration with the smallest encoded sample.
/// Binarization ranges are fitted to the sampled prefix, so the sample
/// must cover the value range of everything encoded under the result.
pub fn analyze(input: &DataBlock, block_size: usize) -> SabacResult<EncodingConfig> {
    let word_size = input.word_size();
    let sample_len = input.len().min(block_size.max(1));
    let mut sample = DataBlock::new(0, word_size)?;
    for i in 0..sample_len {
        sample.push(input.get(i));
    }

    let mut best: Option<(usize, EncodingConfig)> = None;
    for (transform, parameters) in CANDIDATE_TRANSFORMS {
        let Some(stream_configs) = plan_streams(transform, parameters, &sample, word_size)? else {
            continue;
        };
        for mode in CANDIDATE_MODES {
            let config = EncodingConfig {
                word_size,
                transform,
                transform_parameters: parameters.to_vec(),
                streams: stream_configs
                    .iter()
                    .map(|&(binarization, parameter, word_size)| StreamConfig {
                        binarization,
                        parameter,
                        context_selection: mode,
                        word_size,
                    })
                    .collect(),
            };
            match encode(sample.clone(), &config) {
                Ok(bytes) => {
                    tracing::trace!(
                        transform = transform.name(),
                        ?mode,
                        size = bytes.len(),
                        "candidate evaluated"
                    );
                    if best.as_ref().map_or(true, |(size, _)| bytes.len() < *size) {
                        best = Some((bytes.len(), config));
                    }
                }
                Err(SabacError::InvalidInput(_)) | Err(SabacError::Unsupported(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    match best {
        Some((size, config)) => {
            tracing::debug!(
                transform = config.transform.name(),
                sample_symbols = sample_len,
                sample_bytes = size,
                "analyze chose configuration"
            );
            Ok(config)
        }
        None => Err(SabacError::InvalidInput(
            "no applicable configuration for this block".into(),
        )),
    }
}

type StreamPlan = (BinarizationId, u32, usize);

/// Runs the forward transform on the sample and picks a binarization per
/// output stream from its observed value range. Returns None when some
/// stream cannot be represented by any candidate binarization.
fn plan_streams(
    transform_id: TransformId,
    parameters: &[u64],
    sample: &DataBlock,
    word_size: usize,
) -> SabacResult<Option<Vec<StreamPlan>>> {
    let mut streams = vec![sample.clone()];
    transform::forward(transform_id, parameters, &mut streams)?;

    let descriptors = transform_id.streams();
    let mut plans = Vec::with_capacity(streams.len());
    for (stream, descriptor) in streams.iter().zip(descriptors) {
        let stream_word_size = if descriptor.word_size == 0 {
            word_size
        } else {
            descriptor.word_size
        };
        let signed = transform_id == TransformId::DiffCoding;
        let Some((binarization, parameter)) = pick_binarization(stream, signed) else {
            return Ok(None);
        };
        plans.push((binarization, parameter, stream_word_size));
    }
    Ok(Some(plans))
}

fn pick_binarization(stream: &DataBlock, signed: bool) -> Option<(BinarizationId, u32)> {
    if signed {
        let mut min = 0i64;
        let mut max = 0i64;
        for i in 0..stream.len() {
            let v = stream.get_signed(i);
            min = min.min(v);
            max = max.max(v);
        }
        let seg_min = i64::from(i32::MIN) / 2;
        let seg_max = i64::from(i32::MAX) / 2;
        if min >= seg_min && max <= seg_max {
            return Some((BinarizationId::Seg, 0));
        }
        return None;
    }

    let mut max = 0u64;
    for i in 0..stream.len() {
        max = max.max(stream.get(i));
    }
    if max <= 16 {
        Some((BinarizationId::Tu, (max as u32).max(1)))
    } else {
        let bits = 64 - max.leading_zeros();
        if bits <= 32 {
            Some((BinarizationId::Bi, bits))
        } else {
            None
        }
    }
}
