use byteorder::{LittleEndian, WriteBytesExt};

use crate::coding::{self, Binarization};
use crate::config::EncodingConfig;
use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};
use crate::transform;

/// Encodes one block under the given configuration. The output carries,
/// per transformed stream in descriptor order, a `u32` little-endian
/// symbol count, a `u32` little-endian payload length, and the CABAC
/// payload bytes.
pub fn encode(input: DataBlock, config: &EncodingConfig) -> SabacResult<Vec<u8>> {
    config.validate()?;
    if input.word_size() != config.word_size {
        return Err(SabacError::InvalidInput(format!(
            "input word size {} does not match configuration word size {}",
            input.word_size(),
            config.word_size
        )));
    }
    if input.len() > u32::MAX as usize {
        return Err(SabacError::InvalidInput(
            "block exceeds u32::MAX symbols".into(),
        ));
    }
    let input_len = input.len();

    let mut streams = vec![input];
    transform::forward(config.transform, &config.transform_parameters, &mut streams)?;

    // Validate every pre-CABAC stream before emitting anything.
    let mut binarizations = Vec::with_capacity(streams.len());
    for (stream, stream_config) in streams.iter().zip(&config.streams) {
        let binarization = Binarization::new(stream_config.binarization, stream_config.parameter)?;
        validate_symbol_range(stream, &binarization)?;
        if stream.len() > u32::MAX as usize {
            return Err(SabacError::InvalidInput(
                "transformed stream exceeds u32::MAX symbols".into(),
            ));
        }
        binarizations.push(binarization);
    }

    let mut out = Vec::new();
    for ((stream, stream_config), binarization) in
        streams.iter().zip(&config.streams).zip(&binarizations)
    {
        let payload = coding::encode_stream(stream, *binarization, stream_config.context_selection)?;
        out.write_u32::<LittleEndian>(stream.len() as u32)?;
        out.write_u32::<LittleEndian>(payload.len() as u32)?;
        out.extend_from_slice(payload.as_bytes());
        tracing::trace!(
            symbols = stream.len(),
            payload_bytes = payload.len(),
            "stream encoded"
        );
    }
    tracing::debug!(
        transform = config.transform.name(),
        input_symbols = input_len,
        output_bytes = out.len(),
        "block encoded"
    );
    Ok(out)
}

fn validate_symbol_range(stream: &DataBlock, binarization: &Binarization) -> SabacResult<()> {
    if binarization.is_signed() {
        let (min, max) = (binarization.min_value(), binarization.max_value());
        for i in 0..stream.len() {
            let v = stream.get_signed(i);
            if v < min || v > max {
                return Err(SabacError::InvalidInput(format!(
                    "symbol {} outside {} range [{}, {}]",
                    v,
                    binarization.id().name(),
                    min,
                    max
                )));
            }
        }
    } else {
        let max = binarization.max_value() as u64;
        for i in 0..stream.len() {
            let v = stream.get(i);
            if v > max {
                return Err(SabacError::InvalidInput(format!(
                    "symbol {} outside {} range [0, {}]",
                    v,
                    binarization.id().name(),
                    max
                )));
            }
        }
    }
    Ok(())
}
