//! Backtracking piece-choice search.
//!
//! Purpose
//! - `CombinationSearch`: a resumable DFS state machine over a complete tree
//!   with fixed branching factor and depth. It only tracks choices; callers
//!   report each choice as valid or invalid.
//! - `ChoiceEngine`: drives a `CombinationSearch` with shape overlap tests to
//!   find the next piece whose lookahead chain fits the world.
//!
//! Status and errors
//! - Exhaustion is a routine outcome (`SearchStatus::Exhausted`), not an error.
//! - Contract violations (stepping before reset, reading a choice too early,
//!   stepping a finished raw search) and iteration caps are `SearchError`s.
//! - Nothing in here logs; reporting is left to the caller.
//!
//! Concurrency
//! - Single-threaded and step-driven. A session is replaced wholesale by the
//!   next `reset`; abandoning one needs no cleanup.

mod combination;
mod engine;
mod types;

pub use combination::CombinationSearch;
pub use engine::ChoiceEngine;
pub use types::{SearchCfg, SearchError, SearchStatus, UNASSIGNED};
