//! Form reader for synrules.
//!
//! Turns source text into `Tree`s. Parsing is purely structural: there are no
//! strings, numbers or comments, and every non-delimiter token is an atom.

pub mod parser;

pub use parser::{parse, parse_one};
