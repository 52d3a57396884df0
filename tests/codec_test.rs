//! Round-trip coverage for the typed value codec

use memhook::{DataType, MemoryValue};
use proptest::prelude::*;
use serde_json::json;

fn roundtrip(value: MemoryValue, data_type: DataType) {
    let bytes = value.to_bytes();
    assert_eq!(bytes.len(), data_type.size());
    assert_eq!(MemoryValue::from_bytes(&bytes, data_type), Some(value));
}

#[test]
fn test_extremes_roundtrip() {
    roundtrip(MemoryValue::I8(i8::MIN), DataType::Int8);
    roundtrip(MemoryValue::I16(i16::MAX), DataType::Int16);
    roundtrip(MemoryValue::I32(i32::MIN), DataType::Int32);
    roundtrip(MemoryValue::I64(i64::MAX), DataType::Int64);
    roundtrip(MemoryValue::U8(u8::MAX), DataType::UInt8);
    roundtrip(MemoryValue::U16(0), DataType::UInt16);
    roundtrip(MemoryValue::U32(u32::MAX), DataType::UInt32);
    roundtrip(MemoryValue::U64(u64::MAX), DataType::UInt64);
    roundtrip(MemoryValue::F32(f32::MIN_POSITIVE), DataType::Float32);
    roundtrip(MemoryValue::F64(f64::MAX), DataType::Float64);
}

#[test]
fn test_json_pattern_width_matches_tag() {
    for (value, data_type) in [
        (json!(1), DataType::Int8),
        (json!(1), DataType::Int16),
        (json!(1), DataType::Int32),
        (json!(1), DataType::Int64),
        (json!(1.0), DataType::Float32),
        (json!(1.0), DataType::Float64),
    ] {
        let pattern = MemoryValue::from_json(&value, data_type).unwrap().to_bytes();
        assert_eq!(pattern.len(), data_type.size(), "width mismatch for {data_type}");
    }
}

proptest! {
    #[test]
    fn prop_i32_roundtrip(v in any::<i32>()) {
        roundtrip(MemoryValue::I32(v), DataType::Int32);
    }

    #[test]
    fn prop_u64_roundtrip(v in any::<u64>()) {
        roundtrip(MemoryValue::U64(v), DataType::UInt64);
    }

    #[test]
    fn prop_f64_roundtrip(v in any::<f64>().prop_filter("NaN never compares equal", |v| !v.is_nan())) {
        roundtrip(MemoryValue::F64(v), DataType::Float64);
    }

    #[test]
    fn prop_from_bytes_tolerates_any_buffer(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
        // Decoding must never panic regardless of length
        for data_type in [
            DataType::Int8, DataType::Int16, DataType::Int32, DataType::Int64,
            DataType::UInt8, DataType::UInt16, DataType::UInt32, DataType::UInt64,
            DataType::Float32, DataType::Float64, DataType::Raw,
        ] {
            let _ = MemoryValue::from_bytes(&bytes, data_type);
            let _ = data_type.decode(&bytes);
        }
    }
}
