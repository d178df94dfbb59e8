//! Time-ordered child key allocation.
//!
//! Keys are 20 characters: a 48-bit millisecond timestamp encoded as 8
//! characters in a lexicographically ordered 64-character alphabet, followed
//! by 12 characters of randomness. String comparison of two keys therefore
//! matches creation order, and keys minted in the same millisecond stay
//! ordered because the random suffix is incremented rather than redrawn.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Alphabet in ASCII order so lexicographic comparison matches numeric order.
const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIMESTAMP_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

/// Stateful allocator for push keys. Wrap in a mutex when shared.
#[derive(Debug, Default)]
pub struct PushKeys {
    last_millis: u64,
    /// Indices into [`ALPHABET`] for the previous key's random suffix.
    last_random: [u8; RANDOM_CHARS],
}

impl PushKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next key for the current wall-clock time.
    pub fn next(&mut self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.next_at(millis)
    }

    /// Mint a key for an explicit timestamp. Tests drive this directly.
    pub fn next_at(&mut self, millis: u64) -> String {
        if millis == self.last_millis {
            // Same millisecond: bump the previous suffix so the new key
            // still sorts after it.
            for slot in self.last_random.iter_mut().rev() {
                if *slot < 63 {
                    *slot += 1;
                    break;
                }
                *slot = 0;
            }
        } else {
            let mut rng = rand::thread_rng();
            for slot in self.last_random.iter_mut() {
                *slot = rng.gen_range(0..64);
            }
            self.last_millis = millis;
        }

        let mut key = String::with_capacity(TIMESTAMP_CHARS + RANDOM_CHARS);
        let mut ts = millis;
        let mut head = [0u8; TIMESTAMP_CHARS];
        for slot in head.iter_mut().rev() {
            *slot = (ts % 64) as u8;
            ts /= 64;
        }
        for idx in head.iter().chain(self.last_random.iter()) {
            key.push(ALPHABET[*idx as usize] as char);
        }
        key
    }
}
