//! AI components.

pub mod fsm;


pub use fsm::*;
