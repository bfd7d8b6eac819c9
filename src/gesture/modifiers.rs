//! Modifier key state

use std::fmt;

/// Modifier keys held during an input event.
///
/// Gesture filters compare with `==`: a binding for `shift` does not fire
/// while `shift+ctrl` is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierKeys {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ModifierKeys {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        Self {
            shift,
            ctrl,
            alt,
            meta,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Build from a bit set (shift = 1, ctrl = 2, alt = 4, meta = 8)
    pub fn from_bits(bits: u8) -> Self {
        Self::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0)
    }

    /// Set the flag named `name`; returns false for an unknown name
    pub(crate) fn set_by_name(&mut self, name: &str) -> bool {
        match name {
            "shift" => self.shift = true,
            "ctrl" => self.ctrl = true,
            "alt" => self.alt = true,
            "meta" => self.meta = true,
            _ => return false,
        }
        true
    }
}

impl fmt::Display for ModifierKeys {
    /// Canonical hyphen-joined form, always in shift-ctrl-alt-meta order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.shift, "shift"),
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.meta, "meta"),
        ];
        let mut first = true;
        for (set, name) in names {
            if set {
                if !first {
                    f.write_str("-")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_canonical() {
        let mut keys = ModifierKeys::NONE;
        assert!(keys.set_by_name("meta"));
        assert!(keys.set_by_name("shift"));
        assert_eq!(keys.to_string(), "shift-meta");
        assert_eq!(ModifierKeys::NONE.to_string(), "");
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut keys = ModifierKeys::NONE;
        assert!(!keys.set_by_name("hyper"));
        assert!(keys.is_empty());
    }

    #[test]
    fn bits_cover_all_subsets() {
        let all: std::collections::HashSet<_> = (0u8..16).map(ModifierKeys::from_bits).collect();
        assert_eq!(all.len(), 16);
        assert_eq!(ModifierKeys::from_bits(1), ModifierKeys::SHIFT);
        assert_eq!(ModifierKeys::from_bits(8), ModifierKeys::META);
    }
}
