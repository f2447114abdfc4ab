//! Behavioural tests for the DonnBits decoding engine
//!
//! These tests build small streams by hand and check the documented
//! properties of each token class.

use donnbits::{
    decode_var_int, decompress, decompress_bytes, decompress_with_stats, DcmpError, DcmpOptions,
};

/// Prefix `body` with a supported header
fn stream(body: &[u8]) -> Vec<u8> {
    let mut data = vec![0x00; 6];
    data.extend_from_slice(body);
    data
}

/// Stream capturing `count` one-word entries, entry `i` holding `i` big-endian
fn captured_entries(count: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for i in 0..count {
        body.push(0x11);
        body.extend_from_slice(&(i as u16).to_be_bytes());
    }
    body
}

#[test]
fn test_var_int_documented_values() {
    assert_eq!(decode_var_int(&[0x00], 0).unwrap(), (0, 1));
    assert_eq!(
        decode_var_int(&[0xFF, 0x00, 0x00, 0x01, 0x00], 0).unwrap(),
        (256, 5)
    );

    // recompute the two-byte bias formula independently
    let lead = 0x90i64;
    let low = 0x05i64;
    let biased = ((lead * 512 - 0x8000) as u16 as i16 as i64) >> 1;
    let expected = (biased + low) as u16 as i16 as i64;
    assert_eq!(decode_var_int(&[0x90, 0x05], 0).unwrap(), (expected, 2));
}

#[test]
fn test_var_int_two_byte_range() {
    for lead in 0x80..=0xFEu8 {
        for low in [0x00, 0x7F, 0xFF] {
            let (value, size) = decode_var_int(&[lead, low], 0).unwrap();
            assert_eq!(size, 2);
            assert!((-16384..=16127).contains(&value), "{lead:#X} {low:#X} -> {value}");
        }
    }
}

#[test]
fn test_first_entry_is_index_zero() {
    let data = stream(&[0x12, 0xAA, 0xBB, 0xCC, 0xDD, 0x23, 0xFF]);
    let output = decompress_bytes(&data, 64).unwrap();
    assert_eq!(
        output,
        vec![0xAA, 0xBB, 0xCC, 0xDD, 0xAA, 0xBB, 0xCC, 0xDD]
    );
}

#[test]
fn test_replay_order_is_positional() {
    let data = stream(&[0x11, 0x01, 0x02, 0x10, 0x01, 0x03, 0x04, 0x24, 0x23, 0xFF]);
    let output = decompress_bytes(&data, 64).unwrap();
    assert_eq!(output, vec![1, 2, 3, 4, 3, 4, 1, 2]);
}

#[test]
fn test_short_indexed_replay() {
    let mut body = captured_entries(41);
    body.extend_from_slice(&[0x20, 0x00, 0x4A, 0xFF]);
    let output = decompress_bytes(&stream(&body), 4096).unwrap();

    let tail = &output[output.len() - 4..];
    // 0x20 0x00 -> entry 40, 0x4A -> entry 39
    assert_eq!(tail, &[0x00, 0x28, 0x00, 0x27]);
}

#[test]
fn test_long_indexed_replay() {
    let mut body = captured_entries(300);
    body.extend_from_slice(&[0x21, 0x03, 0x20, 0xFF, 0xFF]);
    let output = decompress_bytes(&stream(&body), 4096).unwrap();

    let tail = &output[output.len() - 4..];
    // 0x21 0x03 -> entry 299, 0x20 0xFF -> entry 295
    assert_eq!(tail, &[0x01, 0x2B, 0x01, 0x27]);
}

#[test]
fn test_indexed_replay_out_of_range() {
    let mut body = captured_entries(40);
    body.extend_from_slice(&[0x20, 0x00, 0xFF]);
    assert!(matches!(
        decompress_bytes(&stream(&body), 4096),
        Err(DcmpError::InvalidBackReference { index: 40, len: 40 })
    ));

    let body = [0x21, 0x00, 0xFF];
    assert!(matches!(
        decompress_bytes(&stream(&body), 4096),
        Err(DcmpError::InvalidBackReference { index: 296, len: 0 })
    ));
}

#[test]
fn test_jump_table_offsets() {
    // segment 1, two entries, running offsets 6 and 10
    let data = stream(&[0xFE, 0x00, 0x01, 0x02, 0x06, 0x0A, 0xFF]);
    let output = decompress_bytes(&data, 256).unwrap();

    let stub = [0x3F, 0x3C, 0x00, 0x01, 0xA9, 0xF0];
    assert_eq!(output.len(), 8 + 8 + 6);
    assert_eq!(&output[0..6], &stub);
    assert_eq!(&output[6..8], &[0x00, 0x06]);
    assert_eq!(&output[8..14], &stub);
    assert_eq!(&output[14..16], &[0x00, 0x0A]);
    assert_eq!(&output[16..22], &stub);
}

#[test]
fn test_jump_table_zero_deltas() {
    // offset starts at 6 and each delta is applied minus the 6-byte stub
    let data = stream(&[0xFE, 0x00, 0x01, 0x02, 0x00, 0x04, 0xFF]);
    let output = decompress_bytes(&data, 256).unwrap();
    assert_eq!(&output[6..8], &[0x00, 0x00]);
    assert_eq!(&output[14..16], &[0xFF, 0xFE]);
}

#[test]
fn test_rle_zero_count_emits_nothing() {
    let data = stream(&[0xFE, 0x03, 0x05, 0x00, 0xFF]);
    assert!(matches!(
        decompress_bytes(&data, 64),
        Err(DcmpError::InvalidRunLength { count: 0, .. })
    ));
}

#[test]
fn test_unsupported_token_0x22() {
    let data = stream(&[0x4C, 0x22, 0x4C, 0xFF]);
    match decompress_bytes(&data, 64) {
        Err(DcmpError::UnsupportedToken { token: 0x22, offset }) => assert_eq!(offset, 7),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_unsupported_header_ids() {
    let mut data = stream(&[0xFF]);
    data[3] = 1;
    assert!(matches!(
        decompress_bytes(&data, 2),
        Err(DcmpError::UnsupportedFormat {
            algorithm_id: 1,
            table_id: 0
        })
    ));

    let mut data = stream(&[0xFF]);
    data[4] = 0x01;
    assert!(matches!(
        decompress_bytes(&data, 2),
        Err(DcmpError::UnsupportedFormat {
            algorithm_id: 0,
            table_id: 0x100
        })
    ));
}

#[test]
fn test_ratio_and_overrun_are_ignored() {
    let plain = stream(&[0x4C, 0xFF]);
    let mut decorated = plain.clone();
    decorated[0] = 0xFF;
    decorated[1] = 0x80;
    assert_eq!(
        decompress_bytes(&plain, 2).unwrap(),
        decompress_bytes(&decorated, 2).unwrap()
    );
}

#[test]
fn test_size_exhaustion_yields_declared_length() {
    let data = stream(&[0xFE, 0x03, 0x4E, 0x7F]);
    for size in [1, 2, 7, 100, 256] {
        let output = decompress(&data, 0, size).unwrap();
        assert_eq!(output.len(), size);
    }
}

#[test]
fn test_runs_do_not_share_tables() {
    let first = stream(&[0x11, 0x12, 0x34, 0x23, 0xFF]);
    let second = stream(&[0x23, 0xFF]);

    assert_eq!(decompress_bytes(&first, 8).unwrap(), vec![0x12, 0x34, 0x12, 0x34]);
    assert!(matches!(
        decompress_bytes(&second, 8),
        Err(DcmpError::InvalidBackReference { index: 0, len: 0 })
    ));
}

#[test]
fn test_strict_mode() {
    let data = stream(&[0x4C, 0xFF]);
    let options = DcmpOptions::new(4).with_strict_size(true);
    assert!(matches!(
        decompress_with_stats(&data, &options),
        Err(DcmpError::SizeMismatch {
            expected: 4,
            actual: 2
        })
    ));

    let options = DcmpOptions::new(2).with_strict_size(true);
    assert!(decompress_with_stats(&data, &options).is_ok());
}

#[test]
fn test_negative_counts_rejected() {
    // jump table with a negative entry count
    let data = stream(&[0xFE, 0x00, 0x01, 0x80, 0x00, 0xFF]);
    assert!(matches!(
        decompress_bytes(&data, 64),
        Err(DcmpError::InvalidCount { count: -16384, .. })
    ));

    // delta run with a negative word count
    let data = stream(&[0xFE, 0x04, 0x00, 0xBF, 0xFF, 0xFF]);
    assert!(matches!(
        decompress_bytes(&data, 64),
        Err(DcmpError::InvalidCount { count: -1, .. })
    ));
}
