//! Error envelopes.
//!
//! Errors cross the isolation boundary as plain values: an array whose
//! element 0 is an integer discriminant, followed by kind-specific
//! fields. There is no separate error channel and no wire-level type
//! tag; the receiving side must inspect the shape before treating an
//! array as a success payload. The discriminants are a fixed integer
//! contract and must match byte-for-byte on both sides.
//!
//! | Discriminant | Envelope         | Shape                     |
//! |--------------|------------------|---------------------------|
//! | 1            | argument error   | `[1]`                     |
//! | 2            | OS error         | `[2, code, message]`      |
//! | 3            | file closed      | `[3]`                     |

use crate::value::Value;
use crate::value::ZString;

use alloc::vec;

/// Discriminant of the argument-error envelope.
pub const ARGUMENT_ERROR: i32 = 1;

/// Discriminant of the OS-error envelope.
pub const OS_ERROR: i32 = 2;

/// Discriminant of the file-closed-error envelope.
pub const FILE_CLOSED_ERROR: i32 = 3;

/// Envelope for a caller-supplied argument that was rejected.
pub fn illegal_argument_error() -> Value
{
    Value::array(vec![Value::Int32(ARGUMENT_ERROR)])
}

/// Envelope for an operation on an already-closed resource.
pub fn file_closed_error() -> Value
{
    Value::array(vec![Value::Int32(FILE_CLOSED_ERROR)])
}

/// Envelope for an OS-level failure.
///
/// # Examples
///
/// ```
/// use ember_message::envelope;
/// use ember_message::envelope::Envelope;
///
/// let reply = envelope::os_error(2, "No such file");
/// match Envelope::decode(&reply) {
///     Some(Envelope::OsError{code, message}) => {
///         assert_eq!(code, 2);
///         assert_eq!(message.as_str(), Some("No such file"));
///     },
///     other => panic!("unexpected envelope: {:?}", other),
/// }
/// ```
pub fn os_error(code: i32, message: &str) -> Value
{
    Value::array(vec![
        Value::Int32(OS_ERROR),
        Value::Int32(code),
        Value::string(message),
    ])
}

/// Decoded view of an error envelope.
#[derive(Debug, PartialEq, Eq)]
pub enum Envelope<'a>
{
    /// A caller-supplied argument was rejected.
    ArgumentError,

    /// An OS-level failure, with its error code and message.
    OsError
    {
        /// The OS error code.
        code: i32,

        /// The OS error message.
        message: &'a ZString,
    },

    /// An operation was attempted on an already-closed resource.
    FileClosedError,
}

impl<'a> Envelope<'a>
{
    /// Decode a value as an error envelope.
    ///
    /// Returns [`None`] when the value is not a well-formed error
    /// envelope, in which case it is a success payload.
    pub fn decode(value: &'a Value) -> Option<Self>
    {
        let elements = value.as_array()?;
        let tag = elements.first()?.as_int32()?;
        match (tag, elements) {
            (ARGUMENT_ERROR, [_]) =>
                Some(Envelope::ArgumentError),
            (FILE_CLOSED_ERROR, [_]) =>
                Some(Envelope::FileClosedError),
            (OS_ERROR, [_, Value::Int32(code), Value::String(message)]) =>
                Some(Envelope::OsError{code: *code, message}),
            _ => None,
        }
    }

    /// Tell a success payload apart from an error envelope.
    ///
    /// The wire shape is unchanged by this; it only gives the boundary
    /// a checked result type instead of an inspect-by-convention one.
    pub fn check(value: &'a Value) -> Result<&'a Value, Self>
    {
        match Self::decode(value) {
            Some(envelope) => Err(envelope),
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    use alloc::string::String;
    use proptest::proptest;

    #[test]
    fn argument_error_roundtrip()
    {
        let envelope = illegal_argument_error();
        assert_eq!(
            Envelope::decode(&envelope),
            Some(Envelope::ArgumentError),
        );
    }

    #[test]
    fn file_closed_error_roundtrip()
    {
        let envelope = file_closed_error();
        assert_eq!(
            Envelope::decode(&envelope),
            Some(Envelope::FileClosedError),
        );
    }

    #[test]
    fn os_error_has_the_documented_shape()
    {
        let envelope = os_error(2, "No such file");
        let elements = envelope.as_array().unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], Value::Int32(2));
        assert_eq!(elements[1], Value::Int32(2));
        assert_eq!(
            elements[2].as_string().unwrap().as_str(),
            Some("No such file"),
        );
    }

    #[test]
    fn success_payloads_pass_check()
    {
        let reply = Value::int32(7);
        assert_eq!(Envelope::check(&reply), Ok(&reply));

        // An array that is not an envelope is a success payload too.
        let reply = Value::array(alloc::vec![Value::string("ok")]);
        assert!(Envelope::check(&reply).is_ok());
    }

    #[test]
    fn envelopes_fail_check()
    {
        let reply = file_closed_error();
        assert_eq!(
            Envelope::check(&reply),
            Err(Envelope::FileClosedError),
        );
    }

    #[test]
    fn malformed_envelopes_do_not_decode()
    {
        // Right tag, missing fields.
        let reply = Value::array(alloc::vec![Value::Int32(OS_ERROR)]);
        assert_eq!(Envelope::decode(&reply), None);

        // Unknown tag.
        let reply = Value::array(alloc::vec![Value::Int32(99)]);
        assert_eq!(Envelope::decode(&reply), None);
    }

    proptest!
    {
        #[test]
        fn os_error_roundtrip(code: i32, message: String)
        {
            let envelope = os_error(code, &message);
            match Envelope::decode(&envelope) {
                Some(Envelope::OsError{code: decoded, message: text}) => {
                    assert_eq!(decoded, code);
                    assert_eq!(text.as_bytes(), message.as_bytes());
                },
                other => panic!("unexpected envelope: {:?}", other),
            }
        }
    }
}
