//! Typed value codec: symbolic data-type tags, byte widths and
//! little-endian encode/decode

use super::error::{HookError, HookResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic data-type tag for a monitored or scanned value.
///
/// Tags the caller does not recognize collapse into [`DataType::Raw`],
/// which reads a default-width byte window and passes it through
/// undecoded. Best-effort leniency, matching the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    #[serde(other)]
    Raw,
}

/// Default byte width for unrecognized type tags
pub const DEFAULT_WIDTH: usize = 4;

impl DataType {
    /// Returns the byte width read or written for this tag
    pub const fn size(&self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
            DataType::Raw => DEFAULT_WIDTH,
        }
    }

    /// Decodes a buffer of exactly `self.size()` bytes into a value.
    ///
    /// Buffers of the wrong length, and any buffer tagged [`DataType::Raw`],
    /// come back as raw bytes.
    pub fn decode(&self, bytes: &[u8]) -> MemoryValue {
        MemoryValue::from_bytes(bytes, *self)
            .unwrap_or_else(|| MemoryValue::Bytes(bytes.to_vec()))
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Int32
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::UInt8 => "uint8",
            DataType::UInt16 => "uint16",
            DataType::UInt32 => "uint32",
            DataType::UInt64 => "uint64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Raw => "raw",
        };
        f.write_str(tag)
    }
}

/// A decoded value read from (or searched for in) foreign memory.
///
/// Serializes untagged so replies and notifications carry the plain
/// scalar, not a type wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MemoryValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
}

impl MemoryValue {
    /// Converts the value to its little-endian byte representation
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MemoryValue::I8(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I16(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I64(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U8(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U16(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U64(v) => v.to_le_bytes().to_vec(),
            MemoryValue::F32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::F64(v) => v.to_le_bytes().to_vec(),
            MemoryValue::Bytes(b) => b.clone(),
        }
    }

    /// Creates a value from little-endian bytes based on the data type.
    ///
    /// Returns `None` if the buffer is shorter than the type's width or
    /// the type is [`DataType::Raw`] (the caller keeps the raw bytes).
    pub fn from_bytes(bytes: &[u8], data_type: DataType) -> Option<Self> {
        fn take<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
            bytes.get(..N)?.try_into().ok()
        }

        match data_type {
            DataType::Int8 => bytes.first().map(|&b| MemoryValue::I8(b as i8)),
            DataType::Int16 => take(bytes).map(|b| MemoryValue::I16(i16::from_le_bytes(b))),
            DataType::Int32 => take(bytes).map(|b| MemoryValue::I32(i32::from_le_bytes(b))),
            DataType::Int64 => take(bytes).map(|b| MemoryValue::I64(i64::from_le_bytes(b))),
            DataType::UInt8 => bytes.first().map(|&b| MemoryValue::U8(b)),
            DataType::UInt16 => take(bytes).map(|b| MemoryValue::U16(u16::from_le_bytes(b))),
            DataType::UInt32 => take(bytes).map(|b| MemoryValue::U32(u32::from_le_bytes(b))),
            DataType::UInt64 => take(bytes).map(|b| MemoryValue::U64(u64::from_le_bytes(b))),
            DataType::Float32 => take(bytes).map(|b| MemoryValue::F32(f32::from_le_bytes(b))),
            DataType::Float64 => take(bytes).map(|b| MemoryValue::F64(f64::from_le_bytes(b))),
            DataType::Raw => None,
        }
    }

    /// Builds a value from a JSON payload field, used to construct scan
    /// patterns.
    ///
    /// Integer tags reject out-of-range numbers; `raw` accepts a byte
    /// array and otherwise falls back to a zero-filled default-width
    /// buffer.
    pub fn from_json(value: &serde_json::Value, data_type: DataType) -> HookResult<Self> {
        fn int<T>(value: &serde_json::Value, data_type: DataType) -> HookResult<T>
        where
            T: TryFrom<i64>,
        {
            value
                .as_i64()
                .and_then(|v| T::try_from(v).ok())
                .ok_or_else(|| HookError::invalid_value(data_type.to_string(), value))
        }

        fn uint<T>(value: &serde_json::Value, data_type: DataType) -> HookResult<T>
        where
            T: TryFrom<u64>,
        {
            value
                .as_u64()
                .and_then(|v| T::try_from(v).ok())
                .ok_or_else(|| HookError::invalid_value(data_type.to_string(), value))
        }

        let float = |value: &serde_json::Value| {
            value
                .as_f64()
                .ok_or_else(|| HookError::invalid_value(data_type.to_string(), value))
        };

        Ok(match data_type {
            DataType::Int8 => MemoryValue::I8(int(value, data_type)?),
            DataType::Int16 => MemoryValue::I16(int(value, data_type)?),
            DataType::Int32 => MemoryValue::I32(int(value, data_type)?),
            DataType::Int64 => MemoryValue::I64(int(value, data_type)?),
            DataType::UInt8 => MemoryValue::U8(uint(value, data_type)?),
            DataType::UInt16 => MemoryValue::U16(uint(value, data_type)?),
            DataType::UInt32 => MemoryValue::U32(uint(value, data_type)?),
            DataType::UInt64 => MemoryValue::U64(uint(value, data_type)?),
            DataType::Float32 => MemoryValue::F32(float(value)? as f32),
            DataType::Float64 => MemoryValue::F64(float(value)?),
            DataType::Raw => match value.as_array() {
                Some(items) => {
                    let bytes = items
                        .iter()
                        .map(|item| {
                            item.as_u64()
                                .and_then(|b| u8::try_from(b).ok())
                                .ok_or_else(|| HookError::invalid_value("raw", value))
                        })
                        .collect::<HookResult<Vec<u8>>>()?;
                    MemoryValue::Bytes(bytes)
                }
                None => MemoryValue::Bytes(vec![0; DEFAULT_WIDTH]),
            },
        })
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::I8(v) => write!(f, "{}", v),
            MemoryValue::I16(v) => write!(f, "{}", v),
            MemoryValue::I32(v) => write!(f, "{}", v),
            MemoryValue::I64(v) => write!(f, "{}", v),
            MemoryValue::U8(v) => write!(f, "{}", v),
            MemoryValue::U16(v) => write!(f, "{}", v),
            MemoryValue::U32(v) => write!(f, "{}", v),
            MemoryValue::U64(v) => write!(f, "{}", v),
            MemoryValue::F32(v) => write!(f, "{}", v),
            MemoryValue::F64(v) => write!(f, "{}", v),
            MemoryValue::Bytes(b) => write!(f, "{:?}", b),
        }
    }
}
