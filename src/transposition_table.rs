use static_assertions::const_assert;

use crate::{HEIGHT, WIDTH};

// position keys must fit in the 56-bit key field of a table slot
const_assert!(WIDTH * (HEIGHT + 1) <= 56);

const KEY_BITS: u32 = 56;
const KEY_MASK: u64 = (1 << KEY_BITS) - 1;

/// Base-two logarithm of the main table size
const LOG_SIZE: usize = 23;

const fn med(min: u64, max: u64) -> u64 {
    (min + max) / 2
}

/// Whether `n` has a factor in `min..max`, by dichotomic search
pub fn has_factor(n: u64, min: u64, max: u64) -> bool {
    if min.saturating_mul(min) > n {
        false
    } else if min + 1 >= max {
        n % min == 0
    } else {
        has_factor(n, min, med(min, max)) || has_factor(n, med(min, max), max)
    }
}

/// Smallest prime greater than or equal to `n`
pub fn next_prime(n: u64) -> u64 {
    if has_factor(n, 2, n) {
        next_prime(n + 1)
    } else {
        n
    }
}

/// A fixed-size cache of scores indexed by position key
///
/// Each slot packs a 56-bit key and an 8-bit signed value into one `u64`;
/// an all-zero slot is empty, so callers must never store a value of 0.
/// The slot count is the next prime above a power of two, which spreads
/// `key % size` over independent key bits, and a colliding entry simply
/// overwrites the old one.
#[derive(Clone)]
pub struct TranspositionTable {
    entries: Vec<u64>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_log_size(LOG_SIZE)
    }

    pub fn with_log_size(log_size: usize) -> Self {
        Self {
            entries: vec![0; next_prime(1 << log_size) as usize],
        }
    }

    /// Stores a value, overwriting any slot collision
    pub fn put(&mut self, key: u64, value: i8) {
        debug_assert!(key <= KEY_MASK);
        let index = (key % self.entries.len() as u64) as usize;
        self.entries[index] = key | ((value as u8 as u64) << KEY_BITS);
    }

    /// Fetches the value stored for a key, or 0 when the key is absent
    pub fn get(&self, key: u64) -> i32 {
        let entry = self.entries[(key % self.entries.len() as u64) as usize];
        if entry & KEY_MASK == key {
            ((entry >> KEY_BITS) as u8) as i8 as i32
        } else {
            0
        }
    }

    /// Empties the table in place
    pub fn reset(&mut self) {
        self.entries.fill(0);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A key type a full position key can be truncated to
pub trait PartialKey: Copy + PartialEq {
    const BYTES: usize;

    fn truncate(key: u64) -> Self;
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_partial_key {
    ($($t:ty),*) => {
        $(impl PartialKey for $t {
            const BYTES: usize = std::mem::size_of::<$t>();

            fn truncate(key: u64) -> Self {
                key as $t
            }

            fn from_le_slice(bytes: &[u8]) -> Self {
                <$t>::from_le_bytes(bytes.try_into().unwrap())
            }
        })*
    };
}
impl_partial_key!(u8, u16, u32);

/// The split-storage variant of the table used by the opening book
///
/// Keys are stored truncated; a lookup compares the truncated key only, so
/// two keys that share both a slot and a truncation are indistinguishable.
pub struct PartialKeyTable<K> {
    keys: Vec<K>,
    values: Vec<i8>,
}

impl<K: PartialKey> PartialKeyTable<K> {
    pub fn from_parts(keys: Vec<K>, values: Vec<i8>) -> Self {
        debug_assert!(keys.len() == values.len());
        Self { keys, values }
    }

    pub fn put(&mut self, key: u64, value: i8) {
        let index = (key % self.keys.len() as u64) as usize;
        self.keys[index] = K::truncate(key);
        self.values[index] = value;
    }

    pub fn get(&self, key: u64) -> i32 {
        let index = (key % self.keys.len() as u64) as usize;
        if self.keys[index] == K::truncate(key) {
            self.values[index] as i32
        } else {
            0
        }
    }
}
