//! ConditionGate: "unlock, block, re-lock" per role di atas satu Mutex.
//!
//! Setiap role punya satu `Condvar` dan satu [`WaitQueue`] yang tinggal di
//! dalam state yang dilindungi Mutex. `signal` hanya memberi *permit* kalau
//! ada waiter (wakeup tanpa waiter hilang, tidak di-queue), dan thread yang
//! bangun hanya sukses setelah mengambil permit. Spurious wakeup dan
//! broadcast dari interrupt tidak pernah dihitung sebagai signal.
//!
//! Invariant: `waiting + permits` = jumlah thread yang sedang di dalam `wait`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, MutexGuard, PoisonError};

use crate::role::Role;
use crate::trace::trace;

/// Counter waiter untuk satu role.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WaitQueue {
    // Thread parked yang belum mendapat permit
    waiting: usize,
    // Signal yang sudah diberikan tapi belum diambil
    permits: usize,
}

impl WaitQueue {
    #[inline]
    pub fn waiting(&self) -> usize {
        self.waiting
    }
}

/// State yang menyimpan wait queue per role.
pub trait GateState {
    fn queue(&mut self, role: Role) -> &mut WaitQueue;
}

/// Flag interupsi yang bisa di-clone antar thread.
///
/// Flag dikonsumsi oleh `wait` pertama yang melihatnya, seperti signal yang
/// sudah di-deliver. Raise saat tidak ada yang parked tetap pending sampai
/// wait berikutnya.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set flag. Caller bertanggung jawab membangunkan thread yang parked
    /// (lihat [`ConditionGate::interrupt_all`]) sambil memegang lock.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Hasil `wait`. Kedua varian membawa guard: lock selalu dipegang lagi.
#[must_use]
pub enum Wake<G> {
    Signalled(G),
    Cancelled(G),
}

/// Parking primitive per role.
#[derive(Debug, Default)]
pub struct ConditionGate {
    producer: Condvar,
    consumer: Condvar,
}

impl ConditionGate {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn condvar(&self, role: Role) -> &Condvar {
        match role {
            Role::Producer => &self.producer,
            Role::Consumer => &self.consumer,
        }
    }

    /// Parkir thread sebagai waiter `role` sampai di-signal atau diinterupsi.
    ///
    /// Waiter count untuk `role` dinaikkan di sini dan di-rollback di jalur
    /// cancel. Caller tetap harus mengecek ulang predikatnya dalam loop
    /// `while`: signal membangunkan paling banyak satu thread dan tidak
    /// menjamin predikat sudah benar.
    pub fn wait<'a, S: GateState>(
        &self,
        mut guard: MutexGuard<'a, S>,
        role: Role,
        interrupt: &Interrupt,
    ) -> Wake<MutexGuard<'a, S>> {
        guard.queue(role).waiting += 1;
        trace!(?role, "parking");

        loop {
            let queue = guard.queue(role);

            if queue.permits > 0 {
                queue.permits -= 1;
                trace!(?role, "woken");
                return Wake::Signalled(guard);
            }

            // permits == 0 berarti slot milik thread ini masih dihitung di `waiting`
            if interrupt.take() {
                queue.waiting -= 1;
                trace!(?role, "wait cancelled");
                return Wake::Cancelled(guard);
            }

            // Condvar::wait selalu return dengan lock dipegang lagi.
            // State tidak pernah setengah ter-update saat panic, jadi poison di-ignore.
            guard = self
                .condvar(role)
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Bangunkan satu waiter `role` kalau ada. Returns `false` kalau signal hilang.
    ///
    /// Caller harus memegang lock yang melindungi `state`.
    pub fn signal<S: GateState>(&self, state: &mut S, role: Role) -> bool {
        let queue = state.queue(role);
        if queue.waiting == 0 {
            return false;
        }

        queue.waiting -= 1;
        queue.permits += 1;
        self.condvar(role).notify_one();
        true
    }

    /// Bangunkan semua thread parked supaya mengecek flag interrupt masing-masing.
    ///
    /// Tidak memberi permit: thread yang flag-nya tidak di-raise akan parkir lagi.
    pub fn interrupt_all(&self) {
        self.producer.notify_all();
        self.consumer.notify_all();
    }
}
