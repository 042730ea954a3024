//! Core module: Byte Ring Buffer
//!
//! Prinsip desain:
//! - Passive: tidak ada sinkronisasi internal, dilindungi lock channel
//! - No-Allocation: buffer pre-allocated saat init

mod ring_buffer;

pub use ring_buffer::RingBuffer;
