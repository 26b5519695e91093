//! Transaction-scoped pending write buffer for Cairn
//!
//! Index mutations do not hit the backing store directly: they stage in a
//! [`PendingBuffer`] owned by the enclosing transaction, which gives them
//! - nested-savepoint participation (`savepoint`/`rollback`),
//! - same-transaction read-your-writes visibility (`flush`), and
//! - all-or-nothing resolution (`commit`/`abort`).
//!
//! The buffer holds no transaction machinery of its own. The execution
//! layer invokes its lifecycle methods as explicit callbacks at the
//! matching points of the enclosing transaction.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod buffer;
mod entry;

pub use buffer::{BufferSnapshot, BufferState, FlushOutcome, PendingBuffer};
pub use entry::{FullEntry, PendingEntry};
