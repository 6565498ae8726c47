// ── Rule matching ──
//
// Pure, allocation-light matchers. Nothing in here performs I/O or
// returns an error; invalid input compiles to a pattern that never matches.

pub mod address;
pub mod pattern;
pub mod rules;

pub use address::{AddressPattern, ip_matches};
pub use pattern::{Pattern, pattern_matches};
pub use rules::CompiledRules;
