//! Tagged values that cross the isolation boundary.
//!
//! # Kinds
//!
//! A value is one of nine kinds. The table below lists each kind and
//! the ownership of its payload.
//!
//! | Kind                | Payload                 | Owned by the value |
//! |---------------------|-------------------------|--------------------|
//! | `Null`              | —                       | —                  |
//! | `Bool`              | boolean                 | inline             |
//! | `Int32`             | 32-bit signed integer   | inline             |
//! | `Int64`             | 64-bit signed integer   | inline             |
//! | `Double`            | IEEE double             | inline             |
//! | `String`            | [`ZString`]             | yes                |
//! | `Array`             | fixed-length children   | yes                |
//! | `ByteArray`         | bytes                   | yes                |
//! | `ExternalByteArray` | [`ExternalBytes`]       | no (release hook)  |
//!
//! Once a tree is handed to the transport, the sender gives up
//! ownership of the whole tree; exactly one receiver decodes it.

pub use self::external::*;
pub use self::string::*;

mod external;
mod string;

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Discriminant of a [`Value`].
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind
{
    Null,
    Bool,
    Int32,
    Int64,
    Double,
    String,
    Array,
    ByteArray,
    ExternalByteArray,
}

/// Self-describing value passed between execution contexts.
///
/// Values form trees: an array owns its children, and the length of an
/// array is fixed when it is built. All payloads are exclusively owned
/// by the value, except [`Value::ExternalByteArray`], which borrows
/// externally owned bytes under an explicit release contract.
#[derive(Debug, PartialEq)]
pub enum Value
{
    /// The null value.
    Null,

    /// A boolean.
    Bool(bool),

    /// A 32-bit signed integer.
    Int32(i32),

    /// A 64-bit signed integer.
    Int64(i64),

    /// An IEEE double.
    Double(f64),

    /// Text, stored with its length and a trailing NUL terminator.
    String(ZString),

    /// A fixed-length sequence of child values.
    Array(Box<[Value]>),

    /// Bytes owned by the value.
    ByteArray(Box<[u8]>),

    /// Bytes owned by an external allocator; never copied.
    ExternalByteArray(ExternalBytes),
}

/// The shared null instance.
pub static NULL: Value = Value::Null;

/// The shared true instance.
pub static TRUE: Value = Value::Bool(true);

/// The shared false instance.
pub static FALSE: Value = Value::Bool(false);

impl Value
{
    /// The shared null instance.
    ///
    /// Null carries no payload and is never mutated, so every caller
    /// receives the same instance and no allocation takes place.
    pub fn null() -> &'static Value
    {
        &NULL
    }

    /// The shared instance for the given boolean.
    ///
    /// Like [`null`][`Value::null`], booleans are immutable constants
    /// and are shared rather than allocated.
    pub fn bool(value: bool) -> &'static Value
    {
        if value { &TRUE } else { &FALSE }
    }

    /// Create a 32-bit integer value.
    pub fn int32(value: i32) -> Value
    {
        Value::Int32(value)
    }

    /// Create a 64-bit integer value.
    pub fn int64(value: i64) -> Value
    {
        Value::Int64(value)
    }

    /// Create an integer value from a pointer-sized integer.
    ///
    /// Pointer-sized integers are always sent as 64-bit integers, so
    /// the wire shape does not depend on the host word size.
    pub fn intptr(value: isize) -> Value
    {
        Value::Int64(value as i64)
    }

    /// Create a double value.
    pub fn double(value: f64) -> Value
    {
        Value::Double(value)
    }

    /// Create a string value by copying the given text.
    pub fn string(text: &str) -> Value
    {
        Value::String(ZString::new(text))
    }

    /// Create an array value from the given children.
    ///
    /// The length is fixed from here on; arrays do not resize.
    pub fn array(elements: Vec<Value>) -> Value
    {
        Value::Array(elements.into_boxed_slice())
    }

    /// Create a byte-array value by copying the given bytes.
    pub fn byte_array(bytes: &[u8]) -> Value
    {
        Value::ByteArray(bytes.into())
    }

    /// Create a value around externally owned bytes.
    pub fn external_byte_array(bytes: ExternalBytes) -> Value
    {
        Value::ExternalByteArray(bytes)
    }

    /// The kind of this value.
    pub fn kind(&self) -> Kind
    {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int32(_) => Kind::Int32,
            Value::Int64(_) => Kind::Int64,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::ExternalByteArray(_) => Kind::ExternalByteArray,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool>
    {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, if this is a 32-bit integer.
    pub fn as_int32(&self) -> Option<i32>
    {
        match self {
            Value::Int32(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, if this is a 64-bit integer.
    pub fn as_int64(&self) -> Option<i64>
    {
        match self {
            Value::Int64(value) => Some(*value),
            _ => None,
        }
    }

    /// The double payload, if this is a double.
    pub fn as_double(&self) -> Option<f64>
    {
        match self {
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_string(&self) -> Option<&ZString>
    {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    /// The children, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]>
    {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// The bytes, if this is an owned byte array.
    pub fn as_bytes(&self) -> Option<&[u8]>
    {
        match self {
            Value::ByteArray(bytes) => Some(bytes),
            _ => None,
        }
    }
}
