//! Sync layer: wait/wake protocol dan registry session.
//!
//! Tidak ada lock di sini; keduanya bekerja di atas state yang sudah
//! dilindungi Mutex milik channel.

mod gate;
mod registry;

pub use gate::{ConditionGate, GateState, Interrupt, WaitQueue, Wake};
pub use registry::SessionRegistry;
