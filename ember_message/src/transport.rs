//! The seam between values and whatever carries them.
//!
//! The runtime's message ports are not part of this crate; it only
//! defines the one-shot, fire-and-forget contract they must satisfy.

use crate::value::Value;

/// Raised when a message could not be delivered.
///
/// The undelivered root is handed back, so a failed send never loses
/// ownership of the tree.
#[derive(Debug)]
pub struct SendError(pub Value);

/// One-shot message channel into another execution context.
///
/// Sending transfers ownership of the whole tree; the sender cannot
/// touch it afterwards, and exactly one receiver decodes it. No reply
/// is implied.
pub trait Transport
{
    /// Send a value tree to the receiving context.
    fn send(&self, root: Value) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::value::ExternalBytes;

    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::sync::atomic::AtomicUsize;
    use core::sync::atomic::Ordering;

    /// In-process mailbox standing in for a real port.
    struct Mailbox
    {
        messages: RefCell<Vec<Value>>,
    }

    impl Transport for Mailbox
    {
        fn send(&self, root: Value) -> Result<(), SendError>
        {
            self.messages.borrow_mut().push(root);
            Ok(())
        }
    }

    unsafe fn count_release(peer: *mut (), _data: *mut u8)
    {
        let counter = &*(peer as *const AtomicUsize);
        counter.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn send_transfers_ownership()
    {
        let mailbox = Mailbox{messages: RefCell::new(Vec::new())};
        mailbox.send(Value::int32(7)).unwrap();

        let received = mailbox.messages.borrow_mut().pop().unwrap();
        assert_eq!(received.as_int32(), Some(7));
    }

    #[test]
    fn external_bytes_outlive_the_undecoded_message()
    {
        static RELEASED: AtomicUsize = AtomicUsize::new(0);
        static mut PAYLOAD: [u8; 4] = [1, 2, 3, 4];

        let external = unsafe {
            ExternalBytes::new(
                4,
                core::ptr::addr_of_mut!(PAYLOAD) as *mut u8,
                &RELEASED as *const AtomicUsize as *mut (),
                count_release,
            )
        };

        let mailbox = Mailbox{messages: RefCell::new(Vec::new())};
        mailbox.send(Value::external_byte_array(external)).unwrap();

        // The message sits undecoded; the buffer must stay alive.
        assert_eq!(RELEASED.load(Ordering::SeqCst), 0);

        // The receiver decodes the message and reads the bytes.
        {
            let messages = mailbox.messages.borrow();
            let received = messages.last().unwrap();
            match received {
                Value::ExternalByteArray(bytes) => {
                    assert_eq!(unsafe { bytes.as_slice() }, &[1, 2, 3, 4]);
                },
                other => panic!("unexpected value: {:?}", other),
            }
        }
        assert_eq!(RELEASED.load(Ordering::SeqCst), 0);

        // Dropping the decoded message releases the buffer, once.
        mailbox.messages.borrow_mut().clear();
        assert_eq!(RELEASED.load(Ordering::SeqCst), 1);
    }
}
