//! SessionRegistry: jumlah session aktif dan waiter parked per role.

use crate::role::Role;
use crate::sync::gate::{GateState, WaitQueue};

/// Tidak punya sinkronisasi sendiri; selalu diakses di bawah lock channel.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    producers: usize,
    consumers: usize,
    producer_queue: WaitQueue,
    consumer_queue: WaitQueue,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn sessions(&self, role: Role) -> usize {
        match role {
            Role::Producer => self.producers,
            Role::Consumer => self.consumers,
        }
    }

    /// Jumlah thread parked (belum di-signal) untuk `role`
    #[inline]
    pub fn waiting(&self, role: Role) -> usize {
        match role {
            Role::Producer => self.producer_queue.waiting(),
            Role::Consumer => self.consumer_queue.waiting(),
        }
    }

    /// Catat session baru. Returns jumlah session `role` sesudahnya.
    pub fn attach(&mut self, role: Role) -> usize {
        let count = self.count_mut(role);
        *count += 1;
        *count
    }

    /// Lepas satu session. Returns jumlah session `role` sesudahnya.
    pub fn detach(&mut self, role: Role) -> usize {
        let count = self.count_mut(role);
        debug_assert!(*count > 0, "detach without matching attach");
        *count = count.saturating_sub(1);
        *count
    }

    /// Tidak ada producer maupun consumer: batas generasi.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.producers == 0 && self.consumers == 0
    }

    fn count_mut(&mut self, role: Role) -> &mut usize {
        match role {
            Role::Producer => &mut self.producers,
            Role::Consumer => &mut self.consumers,
        }
    }
}

impl GateState for SessionRegistry {
    fn queue(&mut self, role: Role) -> &mut WaitQueue {
        match role {
            Role::Producer => &mut self.producer_queue,
            Role::Consumer => &mut self.consumer_queue,
        }
    }
}
