//! TypedArray implementation
//!
//! TypedArrays are views over ArrayBuffer, providing typed access to binary data.
//! All 11 types share common implementation via TypedArrayKind.

use crate::array_buffer::JsArrayBuffer;
use crate::handle::Handle;

/// The kind of TypedArray - determines element size and interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedArrayKind {
    /// Int8Array - 8-bit signed integers
    Int8,
    /// Uint8Array - 8-bit unsigned integers
    Uint8,
    /// Uint8ClampedArray - 8-bit unsigned integers (clamped)
    Uint8Clamped,
    /// Int16Array - 16-bit signed integers
    Int16,
    /// Uint16Array - 16-bit unsigned integers
    Uint16,
    /// Int32Array - 32-bit signed integers
    Int32,
    /// Uint32Array - 32-bit unsigned integers
    Uint32,
    /// Float32Array - 32-bit floating point
    Float32,
    /// Float64Array - 64-bit floating point
    Float64,
    /// BigInt64Array - 64-bit signed integers (BigInt)
    BigInt64,
    /// BigUint64Array - 64-bit unsigned integers (BigInt)
    BigUint64,
}

impl TypedArrayKind {
    /// Get the byte size of each element
    pub fn element_size(&self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::Float64 | TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => 8,
        }
    }

    /// Get the name of this TypedArray type
    pub fn name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
        }
    }

    /// Check if this is a BigInt typed array
    pub fn is_bigint(&self) -> bool {
        matches!(self, TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64)
    }
}

/// A JavaScript TypedArray
///
/// TypedArray is a view over an ArrayBuffer, providing typed access to binary data.
/// It does not copy data - it references the underlying buffer.
#[derive(Debug)]
pub struct JsTypedArray {
    /// The underlying ArrayBuffer
    buffer: Handle<JsArrayBuffer>,
    /// Byte offset into the buffer
    byte_offset: usize,
    /// Number of elements (not bytes)
    length: usize,
    /// The kind of typed array
    kind: TypedArrayKind,
}

impl JsTypedArray {
    /// Create a new TypedArray view over an ArrayBuffer
    pub fn new(
        buffer: Handle<JsArrayBuffer>,
        kind: TypedArrayKind,
        byte_offset: usize,
        length: usize,
    ) -> Result<Self, &'static str> {
        let elem_size = kind.element_size();

        if byte_offset % elem_size != 0 {
            return Err("byte offset must be aligned to element size");
        }

        let byte_length = length
            .checked_mul(elem_size)
            .ok_or("TypedArray length overflow")?;
        let end = byte_offset
            .checked_add(byte_length)
            .ok_or("TypedArray length overflow")?;
        if end > buffer.byte_length() {
            return Err("TypedArray would extend past end of buffer");
        }

        Ok(Self {
            buffer,
            byte_offset,
            length,
            kind,
        })
    }

    /// Create a new TypedArray with its own zeroed buffer
    pub fn with_length(kind: TypedArrayKind, length: usize) -> Result<Self, &'static str> {
        let byte_length = length
            .checked_mul(kind.element_size())
            .ok_or("TypedArray length overflow")?;
        Self::new(Handle::new(JsArrayBuffer::new(byte_length)), kind, 0, length)
    }

    /// Same kind, offset and length, viewing `buffer` instead.
    /// `buffer` must be at least as long as the current one.
    pub(crate) fn rebind(&self, buffer: Handle<JsArrayBuffer>) -> Self {
        debug_assert!(buffer.byte_length() >= self.byte_offset + self.byte_length());
        Self {
            buffer,
            byte_offset: self.byte_offset,
            length: self.length,
            kind: self.kind,
        }
    }

    /// Get the kind of this TypedArray
    pub fn kind(&self) -> TypedArrayKind {
        self.kind
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
        self.length * self.kind.element_size()
    }

    /// Get the number of elements
    pub fn length(&self) -> usize {
        self.length
    }

    /// Copy of the bytes covered by this view
    pub fn bytes(&self) -> Vec<u8> {
        let range = self.byte_offset..self.byte_offset + self.byte_length();
        self.buffer.with_data(|data| data[range].to_vec())
    }

    /// Get an element as f64 (for non-BigInt arrays)
    pub fn get(&self, index: usize) -> Option<f64> {
        if index >= self.length {
            return None;
        }

        let byte_index = self.byte_offset + index * self.kind.element_size();

        Some(self.buffer.with_data(|data| {
            let bytes = &data[byte_index..];
            match self.kind {
                TypedArrayKind::Int8 => bytes[0] as i8 as f64,
                TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => bytes[0] as f64,
                TypedArrayKind::Int16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f64,
                TypedArrayKind::Uint16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f64,
                TypedArrayKind::Int32 => {
                    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
                }
                TypedArrayKind::Uint32 => {
                    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
                }
                TypedArrayKind::Float32 => {
                    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
                }
                TypedArrayKind::Float64 => f64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ]),
                // BigInt arrays return NaN for regular get - use get_bigint
                TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => f64::NAN,
            }
        }))
    }

    /// Get an element as i64 (for BigInt arrays)
    pub fn get_bigint(&self, index: usize) -> Option<i64> {
        if index >= self.length || !self.kind.is_bigint() {
            return None;
        }

        let byte_index = self.byte_offset + index * 8;

        Some(self.buffer.with_data(|data| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&data[byte_index..byte_index + 8]);
            i64::from_le_bytes(raw)
        }))
    }

    /// Set an element from f64 (for non-BigInt arrays)
    pub fn set(&self, index: usize, value: f64) -> bool {
        if index >= self.length || self.kind.is_bigint() {
            return false;
        }

        let byte_index = self.byte_offset + index * self.kind.element_size();

        self.buffer.with_data_mut(|data| {
            let bytes = &mut data[byte_index..];
            match self.kind {
                TypedArrayKind::Int8 => {
                    bytes[0] = value as i8 as u8;
                }
                TypedArrayKind::Uint8 => {
                    bytes[0] = value as u8;
                }
                TypedArrayKind::Uint8Clamped => {
                    bytes[0] = if value.is_nan() || value < 0.0 {
                        0
                    } else if value > 255.0 {
                        255
                    } else {
                        value.round() as u8
                    };
                }
                TypedArrayKind::Int16 => {
                    bytes[..2].copy_from_slice(&(value as i16).to_le_bytes());
                }
                TypedArrayKind::Uint16 => {
                    bytes[..2].copy_from_slice(&(value as u16).to_le_bytes());
                }
                TypedArrayKind::Int32 => {
                    bytes[..4].copy_from_slice(&(value as i32).to_le_bytes());
                }
                TypedArrayKind::Uint32 => {
                    bytes[..4].copy_from_slice(&(value as u32).to_le_bytes());
                }
                TypedArrayKind::Float32 => {
                    bytes[..4].copy_from_slice(&(value as f32).to_le_bytes());
                }
                TypedArrayKind::Float64 => {
                    bytes[..8].copy_from_slice(&value.to_le_bytes());
                }
                TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => {}
            }
        });

        true
    }

    /// Set an element from i64 (for BigInt arrays)
    pub fn set_bigint(&self, index: usize, value: i64) -> bool {
        if index >= self.length || !self.kind.is_bigint() {
            return false;
        }

        let byte_index = self.byte_offset + index * 8;
        self.buffer.with_data_mut(|data| {
            data[byte_index..byte_index + 8].copy_from_slice(&value.to_le_bytes());
        });
        true
    }
}
