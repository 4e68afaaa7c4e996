pub mod analyze;
pub mod bit_io;
pub mod coding;
pub mod config;
pub mod data_block;
pub mod decode;
pub mod encode;
pub mod error;
pub mod transform;

pub use analyze::analyze;
pub use coding::{Binarization, BinarizationId, ContextSelection};
pub use config::{EncodingConfig, StreamConfig};
pub use data_block::DataBlock;
pub use decode::decode;
pub use encode::encode;
pub use error::{SabacError, SabacResult};
pub use transform::TransformId;

pub const VERSION: &str = "0.1.0";
