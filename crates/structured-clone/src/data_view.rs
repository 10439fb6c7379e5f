//! DataView implementation
//!
//! DataView provides byte-level access to a window of an ArrayBuffer, with
//! explicit control over byte order.

use crate::array_buffer::JsArrayBuffer;
use crate::handle::Handle;

/// A JavaScript DataView
#[derive(Debug)]
pub struct JsDataView {
    /// The underlying ArrayBuffer
    buffer: Handle<JsArrayBuffer>,
    /// Byte offset into the buffer
    byte_offset: usize,
    /// Length of the view in bytes
    byte_length: usize,
}

impl JsDataView {
    /// Create a new DataView over an ArrayBuffer.
    /// `byte_length` of `None` extends the view to the end of the buffer.
    pub fn new(
        buffer: Handle<JsArrayBuffer>,
        byte_offset: usize,
        byte_length: Option<usize>,
    ) -> Result<Self, &'static str> {
        let buf_len = buffer.byte_length();

        if byte_offset > buf_len {
            return Err("byte offset is outside the bounds of the buffer");
        }

        let actual_length = match byte_length {
            Some(len) => {
                if len > buf_len - byte_offset {
                    return Err("byte length extends beyond the buffer");
                }
                len
            }
            None => buf_len - byte_offset,
        };

        Ok(Self {
            buffer,
            byte_offset,
            byte_length: actual_length,
        })
    }

    /// Same window, viewing `buffer` instead.
    /// `buffer` must be at least as long as the current one.
    pub(crate) fn rebind(&self, buffer: Handle<JsArrayBuffer>) -> Self {
        debug_assert!(buffer.byte_length() >= self.byte_offset + self.byte_length);
        Self {
            buffer,
            byte_offset: self.byte_offset,
            byte_length: self.byte_length,
        }
    }

    /// Get the underlying ArrayBuffer
    pub fn buffer(&self) -> &Handle<JsArrayBuffer> {
        &self.buffer
    }

    /// Get the byte offset into the buffer
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Get the byte length of the view
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Copy of the bytes covered by this view
    pub fn bytes(&self) -> Vec<u8> {
        let range = self.byte_offset..self.byte_offset + self.byte_length;
        self.buffer.with_data(|data| data[range].to_vec())
    }

    fn read<const N: usize>(&self, byte_offset: usize) -> Result<[u8; N], &'static str> {
        if byte_offset.checked_add(N).is_none_or(|end| end > self.byte_length) {
            return Err("offset is outside the bounds of the DataView");
        }
        let start = self.byte_offset + byte_offset;
        Ok(self.buffer.with_data(|data| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(&data[start..start + N]);
            raw
        }))
    }

    fn write<const N: usize>(&self, byte_offset: usize, raw: [u8; N]) -> Result<(), &'static str> {
        if byte_offset.checked_add(N).is_none_or(|end| end > self.byte_length) {
            return Err("offset is outside the bounds of the DataView");
        }
        let start = self.byte_offset + byte_offset;
        self.buffer
            .with_data_mut(|data| data[start..start + N].copy_from_slice(&raw));
        Ok(())
    }

    /// Get a Uint8 at the specified byte offset
    pub fn get_uint8(&self, byte_offset: usize) -> Result<u8, &'static str> {
        self.read::<1>(byte_offset).map(|b| b[0])
    }

    /// Set a Uint8 at the specified byte offset
    pub fn set_uint8(&self, byte_offset: usize, value: u8) -> Result<(), &'static str> {
        self.write(byte_offset, [value])
    }

    /// Get an Int16 at the specified byte offset
    pub fn get_int16(&self, byte_offset: usize, little_endian: bool) -> Result<i16, &'static str> {
        let raw = self.read::<2>(byte_offset)?;
        Ok(if little_endian {
            i16::from_le_bytes(raw)
        } else {
            i16::from_be_bytes(raw)
        })
    }

    /// Set an Int16 at the specified byte offset
    pub fn set_int16(
        &self,
        byte_offset: usize,
        value: i16,
        little_endian: bool,
    ) -> Result<(), &'static str> {
        let raw = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write(byte_offset, raw)
    }

    /// Get a Float64 at the specified byte offset
    pub fn get_float64(&self, byte_offset: usize, little_endian: bool) -> Result<f64, &'static str> {
        let raw = self.read::<8>(byte_offset)?;
        Ok(if little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }

    /// Set a Float64 at the specified byte offset
    pub fn set_float64(
        &self,
        byte_offset: usize,
        value: f64,
        little_endian: bool,
    ) -> Result<(), &'static str> {
        let raw = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write(byte_offset, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let buffer = Handle::new(JsArrayBuffer::new(16));
        let dv = JsDataView::new(buffer.clone(), 3, Some(13)).unwrap();
        assert_eq!(dv.byte_offset(), 3);
        assert_eq!(dv.byte_length(), 13);
        assert!(dv.get_uint8(12).is_ok());
        assert!(dv.get_uint8(13).is_err());
        assert!(JsDataView::new(buffer.clone(), 3, Some(14)).is_err());
        assert!(JsDataView::new(buffer.clone(), 17, None).is_err());
        assert_eq!(JsDataView::new(buffer, 4, None).unwrap().byte_length(), 12);
    }

    #[test]
    fn test_endianness() {
        let buffer = Handle::new(JsArrayBuffer::new(4));
        let dv = JsDataView::new(buffer.clone(), 1, None).unwrap();
        dv.set_int16(0, 0x0102, false).unwrap();
        assert_eq!(buffer.to_vec(), vec![0, 1, 2, 0]);
        assert_eq!(dv.get_int16(0, true).unwrap(), 0x0201);
    }

    #[test]
    fn test_float64_round_trip() {
        let dv = JsDataView::new(Handle::new(JsArrayBuffer::new(8)), 0, None).unwrap();
        dv.set_float64(0, 1.5, true).unwrap();
        assert_eq!(dv.get_float64(0, true).unwrap(), 1.5);
        assert!(dv.get_float64(1, true).is_err());
    }
}
