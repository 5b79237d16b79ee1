//! Decision-support subsystem: claim records, the synthetic dataset, and the
//! rule-based and classifier-based priority scorers.

pub mod claims;
pub mod scoring;
