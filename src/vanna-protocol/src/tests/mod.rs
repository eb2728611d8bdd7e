//! Wire-format tests for vanna-protocol

#[cfg(test)]
pub mod training_tests;
