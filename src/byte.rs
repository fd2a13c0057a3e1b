use core::fmt;
use thiserror::Error;

/// A value that does not fit in seven bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} does not fit in a data byte (0-127)")]
pub struct DataByteError(pub u8);

#[doc = r#"
A MIDI data byte: any byte with a leading `0` bit.

Channel messages carry one or two of these after their status byte.

# Example
```rust
# use smftext::DataByte;
assert_eq!(DataByte::new(64).unwrap().value(), 64);
assert!(DataByte::new(0x80).is_err());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Checks for a leading 0 bit.
    pub const fn new(byte: u8) -> Result<Self, DataByteError> {
        if byte > 0x7F {
            return Err(DataByteError(byte));
        }
        Ok(Self(byte))
    }

    /// Masks away the leading bit
    pub const fn new_masked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// Returns the inner value
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = DataByteError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn data_byte_rejects_status_bytes() {
    assert_eq!(DataByte::new(0x90), Err(DataByteError(0x90)));
    assert_eq!(DataByte::new_masked(0x90).value(), 0x10);
}
