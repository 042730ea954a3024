//! fifochan - Bounded Rendezvous Byte FIFO
//!
//! Arsitektur:
//! - Ring buffer 4096 byte, dilindungi satu Mutex
//! - ConditionGate: Condvar per role dengan permit eksplisit
//! - Rendezvous open: reader menunggu writer dan sebaliknya
//! - End-of-stream dan broken pipe saat populasi session berubah
//!
//! Lihat [`Fifo`] untuk contoh pemakaian.

pub mod channel;
pub mod core;
pub mod error;
pub mod role;
pub mod sync;
mod trace;

pub use channel::{CancelToken, Consumer, Fifo, FifoStats, Producer, Session, CAPACITY};
#[cfg(unix)]
pub use error::host;
pub use error::FifoError;
pub use role::Role;
pub use trace::init_tracing;
