use pretty_assertions::assert_eq;
use proptest::prelude::*;

use sabac::{
    analyze, decode, encode, BinarizationId, ContextSelection, DataBlock, EncodingConfig,
    StreamConfig, TransformId,
};

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

fn stream(
    binarization: BinarizationId,
    parameter: u32,
    context_selection: ContextSelection,
    word_size: usize,
) -> StreamConfig {
    StreamConfig {
        binarization,
        parameter,
        context_selection,
        word_size,
    }
}

/// Per-stream configurations that can carry any byte-valued input through
/// the given transform.
fn byte_safe_streams(transform: TransformId, mode: ContextSelection) -> Vec<StreamConfig> {
    match transform {
        TransformId::NoTransform => vec![stream(BinarizationId::Bi, 8, mode, 1)],
        TransformId::EqualityCoding => vec![
            stream(BinarizationId::Bi, 8, mode, 1),
            stream(BinarizationId::Bi, 1, mode, 1),
        ],
        TransformId::MatchCoding => vec![
            stream(BinarizationId::Bi, 8, mode, 1),
            stream(BinarizationId::Eg, 0, mode, 4),
            stream(BinarizationId::Eg, 0, mode, 4),
        ],
        TransformId::RleCoding => vec![
            stream(BinarizationId::Bi, 8, mode, 1),
            stream(BinarizationId::Bi, 8, mode, 1),
        ],
        TransformId::LutCoding => vec![
            stream(BinarizationId::Bi, 8, mode, 1),
            stream(BinarizationId::Bi, 8, mode, 1),
            stream(BinarizationId::Bi, 8, mode, 1),
        ],
        TransformId::DiffCoding => vec![stream(BinarizationId::Seg, 0, mode, 1)],
    }
}

fn byte_safe_config(
    transform: TransformId,
    parameters: Vec<u64>,
    mode: ContextSelection,
) -> EncodingConfig {
    EncodingConfig {
        word_size: 1,
        transform,
        transform_parameters: parameters,
        streams: byte_safe_streams(transform, mode),
    }
}

const ALL_MODES: [ContextSelection; 3] = [
    ContextSelection::Bypass,
    ContextSelection::Adaptive,
    ContextSelection::BiAdaptive,
];

// --- concrete end-to-end scenarios ---

#[test]
fn scenario_all_zero_bi_bypass() {
    let config = byte_safe_config(TransformId::NoTransform, vec![], ContextSelection::Bypass);
    let config = EncodingConfig {
        streams: vec![stream(BinarizationId::Bi, 1, ContextSelection::Bypass, 1)],
        ..config
    };
    let block = block_of(&[0, 0, 0, 0], 1);
    let bytes = encode(block.clone(), &config).unwrap();
    // Four zero bins plus termination fit two payload bytes.
    assert_eq!(bytes, vec![4, 0, 0, 0, 2, 0, 0, 0, 0x07, 0xF4]);
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

#[test]
fn scenario_equality_coding() {
    let mut streams = vec![block_of(&[5, 5, 5, 6, 6, 7], 1)];
    sabac::transform::forward(TransformId::EqualityCoding, &[], &mut streams).unwrap();
    assert_eq!(collect(&streams[0]), vec![4, 5, 6]);
    assert_eq!(collect(&streams[1]), vec![0, 1, 1, 0, 1, 0]);

    let config = EncodingConfig {
        word_size: 1,
        transform: TransformId::EqualityCoding,
        transform_parameters: vec![],
        streams: vec![
            stream(BinarizationId::Bi, 3, ContextSelection::Bypass, 1),
            stream(BinarizationId::Bi, 1, ContextSelection::Bypass, 1),
        ],
    };
    let block = block_of(&[5, 5, 5, 6, 6, 7], 1);
    let bytes = encode(block.clone(), &config).unwrap();
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

#[test]
fn scenario_diff_coding() {
    let mut streams = vec![block_of(&[0, 1, 2, 3, 4], 1)];
    sabac::transform::forward(TransformId::DiffCoding, &[], &mut streams).unwrap();
    assert_eq!(collect(&streams[0]), vec![0, 1, 1, 1, 1]);

    let config = EncodingConfig {
        word_size: 1,
        transform: TransformId::DiffCoding,
        transform_parameters: vec![],
        streams: vec![stream(BinarizationId::Tu, 4, ContextSelection::Adaptive, 1)],
    };
    let block = block_of(&[0, 1, 2, 3, 4], 1);
    let bytes = encode(block.clone(), &config).unwrap();
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

#[test]
fn scenario_rle_coding() {
    let mut streams = vec![block_of(&[9, 9, 9, 9, 9], 1)];
    sabac::transform::forward(TransformId::RleCoding, &[3], &mut streams).unwrap();
    assert_eq!(collect(&streams[0]), vec![9]);
    assert_eq!(collect(&streams[1]), vec![3, 0]);

    let config = EncodingConfig {
        word_size: 1,
        transform: TransformId::RleCoding,
        transform_parameters: vec![3],
        streams: vec![
            stream(BinarizationId::Bi, 4, ContextSelection::Bypass, 1),
            stream(BinarizationId::Bi, 4, ContextSelection::Bypass, 1),
        ],
    };
    let block = block_of(&[9, 9, 9, 9, 9], 1);
    let bytes = encode(block.clone(), &config).unwrap();
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

#[test]
fn scenario_match_coding() {
    let mut streams = vec![block_of(&[1, 2, 3, 1, 2, 3, 1, 2, 3], 1)];
    sabac::transform::forward(TransformId::MatchCoding, &[16], &mut streams).unwrap();
    assert_eq!(collect(&streams[0]), vec![1, 2, 3]);
    assert_eq!(collect(&streams[1]), vec![0, 0, 0, 3]);
    assert_eq!(collect(&streams[2]), vec![0, 0, 0, 6]);

    let config = EncodingConfig {
        word_size: 1,
        transform: TransformId::MatchCoding,
        transform_parameters: vec![16],
        streams: vec![
            stream(BinarizationId::Eg, 0, ContextSelection::Bypass, 1),
            stream(BinarizationId::Eg, 0, ContextSelection::Bypass, 4),
            stream(BinarizationId::Eg, 0, ContextSelection::Bypass, 4),
        ],
    };
    let block = block_of(&[1, 2, 3, 1, 2, 3, 1, 2, 3], 1);
    let bytes = encode(block.clone(), &config).unwrap();
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

#[test]
fn scenario_lut_coding() {
    let mut streams = vec![block_of(&[0, 1, 2, 3, 4, 5, 6, 7], 1)];
    sabac::transform::forward(TransformId::LutCoding, &[0], &mut streams).unwrap();
    assert_eq!(collect(&streams[0]), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(collect(&streams[1]), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    assert!(streams[2].is_empty());

    let config = EncodingConfig {
        word_size: 1,
        transform: TransformId::LutCoding,
        transform_parameters: vec![0],
        streams: vec![
            stream(BinarizationId::Tu, 7, ContextSelection::Adaptive, 1),
            stream(BinarizationId::Tu, 7, ContextSelection::Adaptive, 1),
            stream(BinarizationId::Tu, 7, ContextSelection::Adaptive, 1),
        ],
    };
    let block = block_of(&[0, 1, 2, 3, 4, 5, 6, 7], 1);
    let bytes = encode(block.clone(), &config).unwrap();
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

// --- invariants and laws ---

#[test]
fn law_empty_input_every_transform() {
    for transform in [
        (TransformId::NoTransform, vec![]),
        (TransformId::EqualityCoding, vec![]),
        (TransformId::MatchCoding, vec![8]),
        (TransformId::RleCoding, vec![16]),
        (TransformId::LutCoding, vec![0]),
        (TransformId::DiffCoding, vec![]),
    ] {
        let (id, params) = transform;
        let config = byte_safe_config(id, params, ContextSelection::Adaptive);
        let bytes = encode(DataBlock::new(0, 1).unwrap(), &config).unwrap();
        // Per stream: zero symbol count, then a single termination byte.
        assert_eq!(bytes.len(), config.streams.len() * 9, "{}", id.name());
        let decoded = decode(&bytes, &config).unwrap();
        assert!(decoded.is_empty(), "{}", id.name());
    }
}

#[test]
fn law_adaptive_beats_uncoded_bits_on_zero_stream() {
    for count in [32usize, 64, 256] {
        let config = EncodingConfig {
            word_size: 1,
            transform: TransformId::NoTransform,
            transform_parameters: vec![],
            streams: vec![stream(BinarizationId::Bi, 1, ContextSelection::Adaptive, 1)],
        };
        let block = block_of(&vec![0u64; count], 1);
        let bytes = encode(block, &config).unwrap();
        let payload_bits = (bytes.len() - 8) * 8;
        assert!(payload_bits < count, "count {}: {} bits", count, payload_bits);
    }
}

#[test]
fn law_roundtrip_over_config_grid() {
    let words: Vec<u64> = (0..400u64).map(|i| (i * i + i / 5) % 251).collect();
    let cases = [
        (TransformId::NoTransform, vec![]),
        (TransformId::EqualityCoding, vec![]),
        (TransformId::MatchCoding, vec![32]),
        (TransformId::RleCoding, vec![3]),
        (TransformId::LutCoding, vec![0]),
        (TransformId::LutCoding, vec![1]),
        (TransformId::DiffCoding, vec![]),
    ];
    for (transform, params) in cases {
        for mode in ALL_MODES {
            let config = byte_safe_config(transform, params.clone(), mode);
            let block = block_of(&words, 1);
            let bytes = encode(block.clone(), &config).unwrap();
            let decoded = decode(&bytes, &config).unwrap();
            assert_eq!(
                decoded,
                block,
                "transform {} mode {:?}",
                transform.name(),
                mode
            );
        }
    }
}

#[test]
fn law_wide_word_roundtrip() {
    for &word_size in &[2usize, 4, 8] {
        let words: Vec<u64> = (0..100u64).map(|i| i * 321).collect();
        let config = EncodingConfig {
            word_size,
            transform: TransformId::DiffCoding,
            transform_parameters: vec![],
            streams: vec![stream(
                BinarizationId::Seg,
                0,
                ContextSelection::BiAdaptive,
                word_size,
            )],
        };
        let block = block_of(&words, word_size);
        let bytes = encode(block.clone(), &config).unwrap();
        assert_eq!(decode(&bytes, &config).unwrap(), block, "w={}", word_size);
    }
}

#[test]
fn law_analyze_produces_working_config() {
    let words: Vec<u64> = (0..600u64).map(|i| (i / 7) % 30).collect();
    let block = block_of(&words, 1);
    let config = analyze(&block, 512).unwrap();
    let bytes = encode(block.clone(), &config).unwrap();
    assert_eq!(decode(&bytes, &config).unwrap(), block);
}

// --- randomized properties ---

fn transform_strategy() -> impl Strategy<Value = (TransformId, Vec<u64>)> {
    prop_oneof![
        Just((TransformId::NoTransform, vec![])),
        Just((TransformId::EqualityCoding, vec![])),
        (1u64..64).prop_map(|w| (TransformId::MatchCoding, vec![w])),
        (1u64..=254).prop_map(|g| (TransformId::RleCoding, vec![g])),
        (0u64..=1).prop_map(|o| (TransformId::LutCoding, vec![o])),
        Just((TransformId::DiffCoding, vec![])),
    ]
}

fn mode_strategy() -> impl Strategy<Value = ContextSelection> {
    prop_oneof![
        Just(ContextSelection::Bypass),
        Just(ContextSelection::Adaptive),
        Just(ContextSelection::BiAdaptive),
    ]
}

proptest! {
    #[test]
    fn prop_pipeline_roundtrip(
        input in prop::collection::vec(any::<u8>(), 0..300),
        (transform, params) in transform_strategy(),
        mode in mode_strategy(),
    ) {
        let words: Vec<u64> = input.iter().map(|&b| u64::from(b)).collect();
        let block = block_of(&words, 1);
        let config = byte_safe_config(transform, params, mode);
        let bytes = encode(block.clone(), &config).unwrap();
        let decoded = decode(&bytes, &config).unwrap();
        prop_assert_eq!(decoded, block);
    }

    #[test]
    fn prop_transform_reversibility(
        input in prop::collection::vec(any::<u16>(), 0..200),
        (transform, params) in transform_strategy(),
    ) {
        let words: Vec<u64> = input.iter().map(|&v| u64::from(v)).collect();
        let original = block_of(&words, 2);
        let mut streams = vec![original.clone()];
        sabac::transform::forward(transform, &params, &mut streams).unwrap();
        sabac::transform::inverse(transform, &params, &mut streams).unwrap();
        prop_assert_eq!(streams.len(), 1);
        prop_assert_eq!(&streams[0], &original);
    }

    #[test]
    fn prop_binarization_totality(value in 0u64..=300_000, parameter in 0u32..=255) {
        use sabac::Binarization;
        use sabac::bit_io::{BitInput, BitOutput};

        for id in [
            BinarizationId::Eg,
            BinarizationId::Teg,
            BinarizationId::Seg,
            BinarizationId::Steg,
        ] {
            let (lo, hi) = id.parameter_range();
            let p = parameter.clamp(lo, hi);
            let b = Binarization::new(id, p).unwrap();
            let symbol = if b.is_signed() {
                // Fold the unsigned value into the signed range.
                let s = (value as i64) - 150_000;
                s as u64
            } else {
                value
            };
            let mut out = BitOutput::new();
            b.encode_symbol(symbol, &mut out).unwrap();
            out.flush();
            let payload = out.into_block();
            let mut input = BitInput::new(&payload);
            prop_assert_eq!(b.decode_symbol(&mut input).unwrap(), symbol);
        }
    }

    #[test]
    fn prop_bit_io_idempotence(value in any::<u32>(), width in 0u32..=32) {
        use sabac::bit_io::{BitInput, BitOutput};

        let mut out = BitOutput::new();
        out.write(value, width);
        out.flush();
        let block = out.into_block();
        let mask = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
        if width > 0 {
            let mut input = BitInput::new(&block);
            prop_assert_eq!(input.read(width).unwrap(), value & mask);
        }
    }
}
