use super::error::OdidError;

/// Sequential little-endian reader over a message buffer.
///
/// Every read is bounds-checked and advances the position by exactly the
/// width it consumed; a failed read leaves the position untouched.
#[derive(Debug, Clone)]
pub struct OdidReader<'a> {
    payload: &'a [u8],
    position: usize,
}

impl<'a> OdidReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            position: 0,
        }
    }

    pub fn at(payload: &'a [u8], position: usize) -> Self {
        Self { payload, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.payload.len().saturating_sub(self.position)
    }

    pub fn require_remaining(&self, needed: usize) -> Result<(), OdidError> {
        if self.remaining() < needed {
            return Err(OdidError::Truncated {
                needed,
                actual: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, OdidError> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, OdidError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, OdidError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32_le(&mut self) -> Result<i32, OdidError> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OdidError> {
        let bytes = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], OdidError> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(OdidError::Truncated {
                needed: len,
                actual: self.remaining(),
            })?;
        let bytes = self
            .payload
            .get(self.position..end)
            .ok_or(OdidError::Truncated {
                needed: len,
                actual: self.remaining(),
            })?;
        self.position = end;
        Ok(bytes)
    }
}
