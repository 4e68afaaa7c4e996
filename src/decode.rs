use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::coding::{self, Binarization};
use crate::config::EncodingConfig;
use crate::data_block::DataBlock;
use crate::error::{SabacError, SabacResult};
use crate::transform;

/// Decodes one encoded block back to its original DataBlock. The inverse
/// of [`crate::encode::encode`] under the same configuration.
pub fn decode(bytes: &[u8], config: &EncodingConfig) -> SabacResult<DataBlock> {
    config.validate()?;
    let mut cursor = std::io::Cursor::new(bytes);

    let mut streams = Vec::with_capacity(config.streams.len());
    for (i, stream_config) in config.streams.iter().enumerate() {
        let num_symbols = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| SabacError::Corrupt("truncated stream header".into()))?;
        let payload_len = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| SabacError::Corrupt("truncated stream header".into()))?;

        let mut payload_bytes = vec![0u8; payload_len as usize];
        cursor
            .read_exact(&mut payload_bytes)
            .map_err(|_| SabacError::Corrupt("truncated stream payload".into()))?;
        let payload = DataBlock::from_bytes(payload_bytes, 1)?;

        let binarization = Binarization::new(stream_config.binarization, stream_config.parameter)?;
        let stream = coding::decode_stream(
            &payload,
            num_symbols as usize,
            binarization,
            stream_config.context_selection,
            config.stream_word_size(i),
        )?;
        tracing::trace!(
            symbols = stream.len(),
            payload_bytes = payload.len(),
            "stream decoded"
        );
        streams.push(stream);
    }
    if cursor.position() as usize != bytes.len() {
        return Err(SabacError::Corrupt("trailing bytes after last stream".into()));
    }

    transform::inverse(config.transform, &config.transform_parameters, &mut streams)?;
    let output = streams.pop().expect("inverse transform leaves one stream");
    tracing::debug!(
        transform = config.transform.name(),
        output_symbols = output.len(),
        "block decoded"
    );
    Ok(output)
}
