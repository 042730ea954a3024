//! Channel Layer: handle publik untuk satu FIFO instance
//!
//! Fitur:
//! - Rendezvous open: producer menunggu consumer dan sebaliknya
//! - Blocking read / write dengan end-of-stream dan broken pipe
//! - Cancellation eksplisit lewat [`CancelToken`]
//!
//! # Example
//!
//! ```
//! use std::thread;
//! use fifochan::Fifo;
//!
//! let fifo = Fifo::new();
//!
//! let reader = {
//!     let fifo = fifo.clone();
//!     thread::spawn(move || {
//!         let consumer = fifo.open_consumer().unwrap();
//!         let mut buf = [0u8; 16];
//!         let n = consumer.read(&mut buf).unwrap();
//!         buf[..n].to_vec()
//!     })
//! };
//!
//! let producer = fifo.open_producer().unwrap();
//! producer.write(b"hello").unwrap();
//!
//! assert_eq!(reader.join().unwrap(), b"hello");
//! ```

mod controller;
mod session;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::error::FifoError;
use crate::role::Role;
use crate::sync::Interrupt;

use controller::ChannelController;

pub use controller::{FifoStats, CAPACITY};
pub use session::{Consumer, Producer, Session};

/// Handle ke satu channel. Clone murah (Arc); semua clone berbagi state.
///
/// Channel dibuat kosong dan hilang bersama handle atau session terakhir.
#[derive(Clone)]
pub struct Fifo {
    controller: Arc<ChannelController>,
}

impl Default for Fifo {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fifo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fifo").field("stats", &self.stats()).finish()
    }
}

impl Fifo {
    pub fn new() -> Self {
        Self {
            controller: Arc::new(ChannelController::new()),
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Buka session dengan role dari host (mis. [`Role::from_open_flags`]).
    pub fn open(&self, role: Role) -> Result<Session, FifoError> {
        self.open_with(role, CancelToken::new())
    }

    pub fn open_with(&self, role: Role, token: CancelToken) -> Result<Session, FifoError> {
        match role {
            Role::Producer => self.open_producer_with(token).map(Session::Producer),
            Role::Consumer => self.open_consumer_with(token).map(Session::Consumer),
        }
    }

    /// Buka write end. Blok sampai ada consumer.
    pub fn open_producer(&self) -> Result<Producer, FifoError> {
        self.open_producer_with(CancelToken::new())
    }

    /// Seperti [`open_producer`](Self::open_producer), tapi open itu sendiri
    /// bisa dibatalkan lewat `token`. Token ikut dipakai oleh session.
    pub fn open_producer_with(&self, token: CancelToken) -> Result<Producer, FifoError> {
        token.park_on(&self.controller);
        self.controller.open(Role::Producer, token.interrupt())?;
        Ok(Producer::new(Arc::clone(&self.controller), token))
    }

    /// Buka read end. Blok sampai ada producer.
    pub fn open_consumer(&self) -> Result<Consumer, FifoError> {
        self.open_consumer_with(CancelToken::new())
    }

    pub fn open_consumer_with(&self, token: CancelToken) -> Result<Consumer, FifoError> {
        token.park_on(&self.controller);
        self.controller.open(Role::Consumer, token.interrupt())?;
        Ok(Consumer::new(Arc::clone(&self.controller), token))
    }

    pub fn stats(&self) -> FifoStats {
        self.controller.stats()
    }
}

/// Interupsi eksternal untuk thread yang parked di Open / Read / Write.
///
/// `cancel()` yang terjadi saat pemilik token sedang parked membuat operasi
/// itu return [`FifoError::Cancelled`]. Kalau pemiliknya tidak sedang
/// parked, cancel tetap pending sampai operasi berikutnya yang harus blok.
/// Satu cancel hanya membatalkan satu wait.
///
/// Token tidak terikat ke satu [`Fifo`]: wake dikirim ke channel tempat
/// operasi terakhir pemiliknya dimulai.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

#[derive(Default)]
struct TokenInner {
    interrupt: Interrupt,
    /// Channel dari operasi terakhir; Weak supaya token tidak menahan channel
    parked_on: Mutex<Weak<ChannelController>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        // Raise dulu: operasi yang baru mulai setelah ini pasti melihat flag
        self.inner.interrupt.raise();
        let channel = self.parked_slot().upgrade();
        if let Some(controller) = channel {
            controller.wake_all();
        }
    }

    /// Cancel sudah di-raise tapi belum dikonsumsi oleh wait mana pun
    pub fn is_pending(&self) -> bool {
        self.inner.interrupt.is_raised()
    }

    /// Catat channel sebelum operasi mengambil lock channel.
    pub(crate) fn park_on(&self, controller: &Arc<ChannelController>) {
        *self.parked_slot() = Arc::downgrade(controller);
    }

    #[inline]
    pub(crate) fn interrupt(&self) -> &Interrupt {
        &self.inner.interrupt
    }

    fn parked_slot(&self) -> MutexGuard<'_, Weak<ChannelController>> {
        self.inner
            .parked_on
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("pending", &self.is_pending())
            .finish()
    }
}
