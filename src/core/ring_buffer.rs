//! Byte Ring Buffer dengan kapasitas tetap
//!
//! Struktur data pasif: tidak ada atomic, tidak ada lock di dalamnya.
//! Semua akses dilindungi oleh Mutex milik channel.

/// Ring buffer untuk byte dengan kapasitas `N`.
///
/// Data keluar dalam urutan masuk (oldest-first). `enqueue` dan `dequeue`
/// menyalin per segmen, maksimal dua `copy_from_slice` saat wraparound.
pub struct RingBuffer<const N: usize> {
    // Pre-allocated di heap - tidak ada alokasi setelah init
    storage: Box<[u8]>,
    // Posisi byte tertua
    head: usize,
    // Jumlah byte yang terisi
    len: usize,
    // Mask untuk operasi modulo yang cepat (N harus power of 2)
    mask: usize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    /// Membuat ring buffer baru. N HARUS power of 2.
    ///
    /// # Panics
    /// Panic jika N bukan power of 2 atau N == 0
    pub fn new() -> Self {
        assert!(N > 0 && N.is_power_of_two(), "N must be power of 2");

        Self {
            storage: vec![0u8; N].into_boxed_slice(),
            head: 0,
            len: 0,
            mask: N - 1,
        }
    }

    /// Jumlah byte yang terisi
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sisa ruang kosong: `capacity - len`
    #[inline]
    pub fn available_space(&self) -> usize {
        N - self.len
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Tambahkan byte ke ekor buffer.
    ///
    /// Caller harus sudah memastikan `available_space() >= bytes.len()`.
    /// Kalau tidak, data dipotong sampai kapasitas penuh. Returns jumlah
    /// byte yang benar-benar masuk.
    pub fn enqueue(&mut self, bytes: &[u8]) -> usize {
        let count = bytes.len().min(self.available_space());
        let tail = (self.head + self.len) & self.mask;

        // Segmen pertama: dari tail sampai ujung storage
        let first = count.min(N - tail);
        self.storage[tail..tail + first].copy_from_slice(&bytes[..first]);
        // Segmen kedua (wraparound) dari awal storage
        self.storage[..count - first].copy_from_slice(&bytes[first..count]);

        self.len += count;
        count
    }

    /// Ambil `min(len, out.len())` byte tertua ke `out`.
    ///
    /// Returns jumlah byte yang disalin.
    pub fn dequeue(&mut self, out: &mut [u8]) -> usize {
        let count = out.len().min(self.len);

        let first = count.min(N - self.head);
        out[..first].copy_from_slice(&self.storage[self.head..self.head + first]);
        out[first..count].copy_from_slice(&self.storage[..count - first]);

        self.head = (self.head + count) & self.mask;
        self.len -= count;
        count
    }

    /// Kosongkan buffer, isi lama dibuang.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
