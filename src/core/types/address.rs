//! Memory address wrapper type with hex parsing

use super::error::{HookError, HookResult};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A virtual address inside a foreign process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a u64 value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw u64 value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Adds a signed offset to the address, wrapping on overflow
    pub const fn offset(&self, offset: i64) -> Self {
        Address(self.0.wrapping_add_signed(offset))
    }

    /// Advances the address by an unsigned length, wrapping on overflow
    pub const fn advance(&self, len: u64) -> Self {
        Address(self.0.wrapping_add(len))
    }
}

impl FromStr for Address {
    type Err = HookError;

    fn from_str(s: &str) -> HookResult<Self> {
        let s = s.trim();

        // Hex with prefix, bare hex when letters are present, decimal otherwise
        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            u64::from_str_radix(s, 16)
        } else {
            s.parse::<u64>()
        };

        value
            .map(Address::new)
            .map_err(|_| HookError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<Address> for u64 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

// Callers pass base addresses either as integers or as hex strings,
// so deserialization accepts both forms.
impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an unsigned integer or a hex string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Address, E> {
                Ok(Address::new(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Address, E> {
                u64::try_from(value)
                    .map(Address::new)
                    .map_err(|_| E::custom("negative address"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Address, E> {
                value.parse().map_err(|e: HookError| E::custom(e))
            }
        }

        deserializer.deserialize_any(AddressVisitor)
    }
}
