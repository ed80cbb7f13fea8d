//! Formula-injection guard
//!
//! Spreadsheet applications evaluate a cell as a formula when its text starts
//! with `=`, `+`, `-` or `@` (after leading whitespace). Prefixing such cells
//! with an apostrophe makes Excel/Sheets display them as plain text.

use std::borrow::Cow;

/// Characters that trigger formula evaluation when they lead a cell
pub const RISKY_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

/// Prefix that neutralizes a risky cell
pub const GUARD_PREFIX: char = '\'';

/// Check whether a value would be interpreted as a formula
pub fn needs_hardening(value: &str) -> bool {
    value
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| RISKY_PREFIXES.contains(&first))
}

/// Harden a single value against formula injection
///
/// The apostrophe is prefixed to the original string, not the trimmed one,
/// so `"  =cmd"` becomes `"'  =cmd"`. Hardened output starts with `'` and is
/// therefore never hardened again.
pub fn harden_cell(value: &str) -> Cow<'_, str> {
    if needs_hardening(value) {
        let mut hardened = String::with_capacity(value.len() + 1);
        hardened.push(GUARD_PREFIX);
        hardened.push_str(value);
        Cow::Owned(hardened)
    } else {
        Cow::Borrowed(value)
    }
}
