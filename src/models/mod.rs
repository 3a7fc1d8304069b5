// Core data models for Prodboard
// These structs represent the domain entities

pub mod card;
pub mod column;
pub mod stage;
pub mod task;

pub use card::*;
pub use column::*;
pub use stage::*;
pub use task::*;

/// Canonical form for enum names typed by users or stored by older clients:
/// trimmed, upper case, `-` and spaces folded to `_`.
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
