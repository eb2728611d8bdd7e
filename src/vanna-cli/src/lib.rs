//! Library half of the `vanna` binary, split out so commands can be driven
//! from tests.

pub mod cli;
pub mod styled_output;
