//! Theme styling engine
//!
//! - roles: pure functions, theme + role (+ context) → inline style declaration
//! - apply: the pass that walks the markup tree and attaches those declarations

pub mod apply;
pub mod roles;

pub use apply::{apply_theme, THEME_ATTR};
pub use roles::StyleContext;
