//! Request id assignment
//!
//! The Microvac panel sends every request with `id: 0`. Over HTTP this is
//! harmless: each request has its own exchange and its response comes back on
//! it, so the transport does the correlation. Bridges that multiplex calls
//! need distinct ids, which `IdStrategy::Sequential` provides.
//!
//! Ids are assigned when a request is built, before it is sent, so two rapid
//! triggers under `Sequential` get increasing ids in trigger order even if
//! their responses complete out of order.

use microvac_core::Id;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// How request ids are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Every request carries the same id
    Fixed(i64),
    /// Ids count up from 0, one per request
    Sequential,
}

impl Default for IdStrategy {
    /// `Fixed(0)`, the id the Microvac bridge has always received
    fn default() -> Self {
        IdStrategy::Fixed(0)
    }
}

/// Hands out ids according to an `IdStrategy`
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    counter: Arc<AtomicI64>,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            counter: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// The id for the next request
    pub fn next_id(&self) -> Id {
        match self.strategy {
            IdStrategy::Fixed(id) => Id::Number(id),
            IdStrategy::Sequential => Id::Number(self.counter.fetch_add(1, Ordering::Relaxed)),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}
