//! Heap handles
//!
//! Every composite value lives behind a [`Handle`], a reference-counted pointer
//! whose address is the value's identity. Two handles are the same object only
//! if they point at the same allocation; structural equality never implies
//! identity.

use std::rc::Rc;

/// Handle to a heap-allocated value
///
/// Cloning a handle yields another reference to the same object, not a copy.
pub struct Handle<T>(Rc<T>);

impl<T> Handle<T> {
    /// Allocate a new object and return a handle to it
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Raw pointer to the object
    pub fn as_ptr(&self) -> *const T {
        Rc::as_ptr(&self.0)
    }

    /// Address of the object, used as its identity key
    #[inline]
    pub fn addr(&self) -> usize {
        self.as_ptr() as usize
    }

    /// Whether both handles refer to the same object
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this object
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({:#x})", self.addr())
    }
}
