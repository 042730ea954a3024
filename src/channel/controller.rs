//! ChannelController: state machine Open / Read / Write / Close.
//!
//! Semua operasi mengambil satu Mutex, mengubah registry / buffer, dan
//! (kalau perlu) parkir lewat [`ConditionGate`]. Copy ke buffer milik caller
//! pada `read` dilakukan setelah lock dilepas.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::RingBuffer;
use crate::error::FifoError;
use crate::role::Role;
use crate::sync::{ConditionGate, GateState, Interrupt, SessionRegistry, WaitQueue, Wake};
use crate::trace::{debug, warn};

/// Kapasitas tetap channel dalam byte
pub const CAPACITY: usize = 4096;

/// Semua field yang dilindungi lock channel.
struct ChannelState {
    buffer: RingBuffer<CAPACITY>,
    registry: SessionRegistry,
}

impl GateState for ChannelState {
    #[inline]
    fn queue(&mut self, role: Role) -> &mut WaitQueue {
        self.registry.queue(role)
    }
}

/// Snapshot state channel pada satu titik waktu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoStats {
    pub producers: usize,
    pub consumers: usize,
    /// Producer parked yang belum di-signal
    pub producers_waiting: usize,
    /// Consumer parked yang belum di-signal
    pub consumers_waiting: usize,
    /// Byte yang sedang ada di buffer
    pub buffered: usize,
}

pub(crate) struct ChannelController {
    state: Mutex<ChannelState>,
    gate: ConditionGate,
}

impl ChannelController {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(ChannelState {
                buffer: RingBuffer::new(),
                registry: SessionRegistry::new(),
            }),
            gate: ConditionGate::new(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        // Tidak ada critical section yang bisa panic di tengah update
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rendezvous open: blok sampai ada minimal satu session role lawan.
    ///
    /// Opener yang bangun meneruskan signal ke opener lain dengan role sama,
    /// jadi satu peer baru membebaskan semua yang menunggu.
    ///
    /// Kalau dibatalkan, session count di-rollback seperti `close`.
    pub(crate) fn open(&self, role: Role, interrupt: &Interrupt) -> Result<(), FifoError> {
        let mut state = self.lock();
        state.registry.attach(role);
        debug!(
            ?role,
            producers = state.registry.sessions(Role::Producer),
            consumers = state.registry.sessions(Role::Consumer),
            "session opened"
        );

        // Peer yang baru datang bisa jadi yang ditunggu waiter role lawan
        self.gate.signal(&mut *state, role.peer());

        let mut parked = false;
        while state.registry.sessions(role.peer()) == 0 {
            parked = true;
            state = match self.gate.wait(state, role, interrupt) {
                Wake::Signalled(state) => state,
                Wake::Cancelled(mut state) => {
                    debug!(?role, "open cancelled");
                    self.release(&mut state, role);
                    return Err(FifoError::Cancelled);
                }
            };
        }

        // Satu peer cukup untuk semua opener role ini: teruskan wake
        // ke opener berikutnya yang masih parked
        if parked {
            self.gate.signal(&mut *state, role);
        }

        Ok(())
    }

    pub(crate) fn close(&self, role: Role) {
        let mut state = self.lock();
        self.release(&mut state, role);
    }

    fn release(&self, state: &mut ChannelState, role: Role) {
        state.registry.detach(role);
        debug!(
            ?role,
            producers = state.registry.sessions(Role::Producer),
            consumers = state.registry.sessions(Role::Consumer),
            "session closed"
        );

        // Waiter role lawan perlu cek ulang (mis. writer cek broken pipe)
        self.gate.signal(state, role.peer());

        if state.registry.is_idle() {
            debug!(discarded = state.buffer.len(), "generation reset");
            state.buffer.reset();
        }
    }

    /// Baca sampai `dst.len()` byte. `Ok(0)` = end-of-stream.
    pub(crate) fn read(&self, dst: &mut [u8], interrupt: &Interrupt) -> Result<usize, FifoError> {
        let mut staging = [0u8; CAPACITY];
        let want = dst.len().min(CAPACITY);

        let count = {
            let mut state = self.lock();

            while state.buffer.is_empty() && state.registry.sessions(Role::Producer) > 0 {
                state = match self.gate.wait(state, Role::Consumer, interrupt) {
                    Wake::Signalled(state) => state,
                    Wake::Cancelled(_) => {
                        debug!("read cancelled");
                        return Err(FifoError::Cancelled);
                    }
                };
            }

            if state.buffer.is_empty() {
                // End-of-stream: teruskan wake ke consumer berikutnya
                self.gate.signal(&mut *state, Role::Consumer);
                return Ok(0);
            }

            let count = state.buffer.dequeue(&mut staging[..want]);

            // Ruang baru saja kosong
            self.gate.signal(&mut *state, Role::Producer);
            count
        };

        dst[..count].copy_from_slice(&staging[..count]);
        Ok(count)
    }

    /// Tulis seluruh `src` atau tidak sama sekali (kecuali broken pipe).
    ///
    /// Saat tidak ada consumer, byte tetap masuk buffer lalu `BrokenPipe`
    /// dikembalikan.
    pub(crate) fn write(&self, src: &[u8], interrupt: &Interrupt) -> Result<usize, FifoError> {
        if src.len() > CAPACITY {
            return Err(FifoError::TooLarge {
                len: src.len(),
                capacity: CAPACITY,
            });
        }

        let mut state = self.lock();

        while state.buffer.available_space() < src.len()
            && state.registry.sessions(Role::Consumer) > 0
        {
            state = match self.gate.wait(state, Role::Producer, interrupt) {
                Wake::Signalled(state) => state,
                Wake::Cancelled(_) => {
                    debug!(len = src.len(), "write cancelled");
                    return Err(FifoError::Cancelled);
                }
            };
        }

        // Hanya bisa terpotong kalau loop keluar karena consumer habis
        if state.buffer.enqueue(src) < src.len() {
            warn!(
                len = src.len(),
                buffered = state.buffer.len(),
                "enqueue truncated at capacity"
            );
        }

        if state.registry.sessions(Role::Consumer) == 0 {
            debug!(buffered = state.buffer.len(), "broken pipe");
            // Writer lain yang parked juga harus melihat broken pipe
            self.gate.signal(&mut *state, Role::Producer);
            return Err(FifoError::BrokenPipe);
        }

        self.gate.signal(&mut *state, Role::Consumer);
        Ok(src.len())
    }

    /// Bangunkan semua thread parked supaya bisa cek flag interrupt masing-masing.
    pub(crate) fn wake_all(&self) {
        // Lock dipegang: waiter yang sudah cek flag pasti sudah park sebelum notify
        let _state = self.lock();
        self.gate.interrupt_all();
    }

    pub(crate) fn stats(&self) -> FifoStats {
        let state = self.lock();
        FifoStats {
            producers: state.registry.sessions(Role::Producer),
            consumers: state.registry.sessions(Role::Consumer),
            producers_waiting: state.registry.waiting(Role::Producer),
            consumers_waiting: state.registry.waiting(Role::Consumer),
            buffered: state.buffer.len(),
        }
    }
}
