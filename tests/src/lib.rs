//! Coopstable Integration Tests
//!
//! Cross-contract scenarios run against the full, wired contract set.

#[cfg(test)]
mod fixture;

#[cfg(test)]
mod lending_flow;

#[cfg(test)]
mod yield_flow;
