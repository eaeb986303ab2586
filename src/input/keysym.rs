// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! X keysym names accepted in port bindings.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown key name: {0}")]
pub struct UnknownKeysym(pub String);

/// Named keysyms useful as shortcut triggers.
const NAMED_KEYSYMS: &[(&str, u32)] = &[
    ("XF86AudioLowerVolume", 0x1008_ff11),
    ("XF86AudioMute", 0x1008_ff12),
    ("XF86AudioRaiseVolume", 0x1008_ff13),
    ("XF86AudioPlay", 0x1008_ff14),
    ("XF86AudioStop", 0x1008_ff15),
    ("XF86AudioPrev", 0x1008_ff16),
    ("XF86AudioNext", 0x1008_ff17),
    ("XF86AudioPause", 0x1008_ff31),
    ("XF86AudioMicMute", 0x1008_ffb2),
    ("Escape", 0xff1b),
    ("Return", 0xff0d),
    ("space", 0x0020),
    ("Pause", 0xff13),
];

const F1: u32 = 0xffbe;
const F_KEY_COUNT: u32 = 35;

/// An X11 keysym value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keysym(u32);

impl Keysym {
    #[cfg(test)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl FromStr for Keysym {
    type Err = UnknownKeysym;

    /// Accepts a known name, `F1`..`F35`, a single printable ASCII
    /// character, or a hex value such as `0x1008ff14`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownKeysym(s.to_string());

        if let Some((_, raw)) = NAMED_KEYSYMS.iter().find(|(name, _)| *name == s) {
            return Ok(Self(*raw));
        }

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16).map(Self).map_err(|_| unknown());
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
            if (1..=F_KEY_COUNT).contains(&n) {
                return Ok(Self(F1 + n - 1));
            }
            return Err(unknown());
        }

        // Latin-1 keysyms equal their code point.
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_graphic() => Ok(Self(c as u32)),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NAMED_KEYSYMS.iter().find(|(_, raw)| *raw == self.0) {
            Some((name, _)) => f.write_str(name),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keysyms() {
        assert_eq!("XF86AudioPlay".parse::<Keysym>().unwrap().raw(), 0x1008ff14);
        assert_eq!("XF86AudioPause".parse::<Keysym>().unwrap().raw(), 0x1008ff31);
    }

    #[test]
    fn test_function_keys() {
        assert_eq!("F1".parse::<Keysym>().unwrap().raw(), 0xffbe);
        assert_eq!("F13".parse::<Keysym>().unwrap().raw(), 0xffca);
        assert!("F36".parse::<Keysym>().is_err());
        assert!("F0".parse::<Keysym>().is_err());
    }

    #[test]
    fn test_hex_and_ascii() {
        assert_eq!("0x1008ff14".parse::<Keysym>().unwrap().raw(), 0x1008ff14);
        assert_eq!("a".parse::<Keysym>().unwrap().raw(), 'a' as u32);
        assert!("0xzz".parse::<Keysym>().is_err());
    }

    #[test]
    fn test_unknown_name() {
        let err = "NotAKey".parse::<Keysym>().unwrap_err();
        assert_eq!(err, UnknownKeysym("NotAKey".to_string()));
    }

    #[test]
    fn test_display_roundtrips_names() {
        let key: Keysym = "XF86AudioMute".parse().unwrap();
        assert_eq!(key.to_string(), "XF86AudioMute");
        assert_eq!(Keysym::from_raw(0xffca).to_string(), "0xffca");
    }
}
