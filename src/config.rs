use serde::{Deserialize, Serialize};

use crate::coding::binarization::{Binarization, BinarizationId};
use crate::coding::context::ContextSelection;
use crate::data_block::SUPPORTED_WORD_SIZES;
use crate::error::{SabacError, SabacResult};
use crate::transform::TransformId;

/// Coding parameters for one transformed stream: how its symbols are
/// binarized and which context selection mode drives the arithmetic coder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub binarization: BinarizationId,
    pub parameter: u32,
    pub context_selection: ContextSelection,
    pub word_size: usize,
}

/// Full configuration for one encode or decode pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub word_size: usize,
    pub transform: TransformId,
    #[serde(default)]
    pub transform_parameters: Vec<u64>,
    pub streams: Vec<StreamConfig>,
}

impl EncodingConfig {
    pub fn from_json(json: &str) -> SabacResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SabacError::InvalidInput(format!("bad configuration: {}", e)))
    }

    pub fn to_json(&self) -> SabacResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SabacError::InvalidInput(format!("bad configuration: {}", e)))
    }

    /// Resolved word size of stream `index`: the transform descriptor's
    /// fixed size, or the input word size where the descriptor inherits.
    pub fn stream_word_size(&self, index: usize) -> usize {
        let fixed = self.transform.streams()[index].word_size;
        if fixed == 0 {
            self.word_size
        } else {
            fixed
        }
    }

    pub fn validate(&self) -> SabacResult<()> {
        if !SUPPORTED_WORD_SIZES.contains(&self.word_size) {
            return Err(SabacError::InvalidInput(format!(
                "unsupported word size: {}",
                self.word_size
            )));
        }
        self.transform
            .validate_parameters(&self.transform_parameters)?;

        let descriptors = self.transform.streams();
        if self.streams.len() != descriptors.len() {
            return Err(SabacError::InvalidInput(format!(
                "transform {} produces {} streams, configuration has {}",
                self.transform.name(),
                descriptors.len(),
                self.streams.len()
            )));
        }
        for (i, stream) in self.streams.iter().enumerate() {
            Binarization::new(stream.binarization, stream.parameter)?;
            let expected = self.stream_word_size(i);
            if stream.word_size != expected {
                return Err(SabacError::InvalidInput(format!(
                    "stream '{}' requires word size {}, configuration has {}",
                    descriptors[i].name, expected, stream.word_size
                )));
            }
        }
        Ok(())
    }
}
