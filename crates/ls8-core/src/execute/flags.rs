//! Condition flags written by `CMP`.

use std::cmp::Ordering;

/// `FL` bit set when the first operand is less than the second.
pub const FLAG_LESS: u8 = 0b0000_0100;
/// `FL` bit set when the first operand is greater than the second.
pub const FLAG_GREATER: u8 = 0b0000_0010;
/// `FL` bit set when both operands are equal.
pub const FLAG_EQUAL: u8 = 0b0000_0001;

/// Condition-code register in `00000LGE` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags {
    bits: u8,
}

impl Flags {
    /// Replaces all three comparison bits with the one matching `ordering`.
    pub const fn set_comparison(&mut self, ordering: Ordering) {
        self.bits = match ordering {
            Ordering::Less => FLAG_LESS,
            Ordering::Greater => FLAG_GREATER,
            Ordering::Equal => FLAG_EQUAL,
        };
    }

    /// Raw `FL` register value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// `E` bit, read by `JEQ` and `JNE`.
    #[must_use]
    pub const fn equal(self) -> bool {
        self.bits & FLAG_EQUAL != 0
    }

    /// `L` bit.
    #[must_use]
    pub const fn less(self) -> bool {
        self.bits & FLAG_LESS != 0
    }

    /// `G` bit.
    #[must_use]
    pub const fn greater(self) -> bool {
        self.bits & FLAG_GREATER != 0
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{Flags, FLAG_EQUAL, FLAG_GREATER, FLAG_LESS};

    #[test]
    fn flags_start_clear() {
        let flags = Flags::default();
        assert_eq!(flags.bits(), 0);
        assert!(!flags.equal() && !flags.less() && !flags.greater());
    }

    #[test]
    fn each_comparison_sets_exactly_one_bit() {
        let mut flags = Flags::default();

        flags.set_comparison(Ordering::Equal);
        assert_eq!(flags.bits(), FLAG_EQUAL);

        flags.set_comparison(Ordering::Greater);
        assert_eq!(flags.bits(), FLAG_GREATER);
        assert!(!flags.equal());

        flags.set_comparison(Ordering::Less);
        assert_eq!(flags.bits(), FLAG_LESS);
        assert!(flags.less() && !flags.greater());
    }
}
