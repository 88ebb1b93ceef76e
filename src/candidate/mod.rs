//! Candidate selection for ranking.
//!
//! Includes the bounded Top-K collector used to keep the best corpus scores.

pub(crate) mod topk;
