//! ArrayBuffer implementation
//!
//! ArrayBuffer is the foundation for TypedArrays and DataViews. Views hold a
//! handle to the buffer, so several views can alias the same bytes.

use std::cell::RefCell;

/// A JavaScript ArrayBuffer
///
/// ArrayBuffer represents a fixed-length raw buffer of binary data.
#[derive(Debug)]
pub struct JsArrayBuffer {
    data: RefCell<Vec<u8>>,
}

impl JsArrayBuffer {
    /// Create a zero-filled ArrayBuffer with the specified byte length
    pub fn new(byte_length: usize) -> Self {
        Self {
            data: RefCell::new(vec![0; byte_length]),
        }
    }

    /// Create an ArrayBuffer holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: RefCell::new(bytes.to_vec()),
        }
    }

    /// Get the byte length
    pub fn byte_length(&self) -> usize {
        self.data.borrow().len()
    }

    /// Read one byte
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.borrow().get(index).copied()
    }

    /// Write one byte. Returns `false` if out of bounds.
    pub fn set(&self, index: usize, value: u8) -> bool {
        match self.data.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the contents
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }

    /// A new buffer with the same length and contents
    pub fn copy(&self) -> Self {
        Self::from_bytes(&self.data.borrow())
    }

    /// Execute a function with read access to the data
    pub fn with_data<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.data.borrow())
    }

    /// Execute a function with write access to the data
    pub fn with_data_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        f(&mut self.data.borrow_mut())
    }
}
