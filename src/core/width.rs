/// The representations a store can occupy, narrowest first.
///
/// Integer widths hold plain unit counts. `Weighted` holds a
/// [`WeightedCell`](crate::core::WeightedCell) per element and is terminal:
/// nothing is wider, and a store never leaves it again.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Width {
    W1,
    W2,
    W4,
    W8,
    Weighted,
}

impl Width {
    pub const NARROWEST: Width = Width::W1;

    /// Size in bytes of one element at this width.
    #[inline(always)]
    pub fn element_size(self) -> usize {
        match self {
            Width::W1 => 1,
            Width::W2 => 2,
            Width::W4 => 4,
            Width::W8 => 8,
            Width::Weighted => 16,
        }
    }

    #[inline]
    pub fn next(self) -> Option<Width> {
        match self {
            Width::W1 => Some(Width::W2),
            Width::W2 => Some(Width::W4),
            Width::W4 => Some(Width::W8),
            Width::W8 => Some(Width::Weighted),
            Width::Weighted => None,
        }
    }

    /// Largest count an integer width can hold, `None` for `Weighted`.
    #[inline]
    pub fn max_count(self) -> Option<u64> {
        match self {
            Width::W1 => Some(u64::from(u8::MAX)),
            Width::W2 => Some(u64::from(u16::MAX)),
            Width::W4 => Some(u64::from(u32::MAX)),
            Width::W8 => Some(u64::MAX),
            Width::Weighted => None,
        }
    }

    #[inline(always)]
    pub fn is_weighted(self) -> bool {
        self == Width::Weighted
    }

    pub fn from_element_size(size: u8) -> Option<Width> {
        match size {
            1 => Some(Width::W1),
            2 => Some(Width::W2),
            4 => Some(Width::W4),
            8 => Some(Width::W8),
            16 => Some(Width::Weighted),
            _ => None,
        }
    }

    /// Narrowest integer width whose ceiling is at least `count`.
    pub fn narrowest_for(count: u64) -> Width {
        if count <= u64::from(u8::MAX) {
            Width::W1
        } else if count <= u64::from(u16::MAX) {
            Width::W2
        } else if count <= u64::from(u32::MAX) {
            Width::W4
        } else {
            Width::W8
        }
    }

    /// Byte length of `len` elements at this width, `None` on overflow.
    #[inline]
    pub fn byte_len(self, len: usize) -> Option<usize> {
        len.checked_mul(self.element_size())
    }
}

impl Default for Width {
    fn default() -> Width {
        Width::NARROWEST
    }
}
