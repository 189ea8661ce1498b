//! Tensor axis descriptors.
//!
//! An [`Index`] names one axis of a tensor. Identity, not length, is the unit
//! of equality: two indices created with the same length are still distinct
//! axes. Identities are small integers drawn from a process-wide counter, so
//! handle comparison never depends on host-object addresses.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

// Cosmetic rendering of identity tags. Any unique rendering per identity
// satisfies the display contract.
const SUPERSCRIPTS: [char; 26] = [
    'ᵃ', 'ᵇ', 'ᶜ', 'ᵈ', 'ᵉ', 'ᶠ', 'ᵍ', 'ʰ', 'ⁱ', 'ʲ', 'ᵏ', 'ˡ', 'ᵐ', 'ⁿ', 'ᵒ', 'ᵖ', 'ᵟ', 'ʳ',
    'ˢ', 'ᵗ', 'ᵘ', 'ᵛ', 'ʷ', 'ˣ', 'ʸ', 'ᶻ',
];

/// One tensor axis: a dimension length plus a globally unique identity.
#[derive(Clone, Copy)]
pub struct Index {
    id: usize,
    length: usize,
}

impl Index {
    /// Allocate a fresh axis of the given dimension length.
    pub fn new(length: usize) -> Self {
        debug_assert!(length > 0, "index length must be positive");
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
            length,
        }
    }

    /// The dimension size of this axis.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The opaque identity handle. Stable for the life of the process.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Superscript rendering of the identity, used in node labels.
    pub fn tag(&self) -> String {
        let mut remainder = self.id;
        let mut out = String::new();
        loop {
            out.insert(0, SUPERSCRIPTS[remainder % SUPERSCRIPTS.len()]);
            remainder /= SUPERSCRIPTS.len();
            if remainder == 0 {
                break;
            }
        }
        out
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Index {}

impl Hash for Index {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.tag())
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The ordered dimension lengths of an index sequence.
pub fn shape(indices: &[Index]) -> Vec<usize> {
    indices.iter().map(Index::length).collect()
}
