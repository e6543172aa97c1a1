//! Lifecycle of a single corridor search attempt.

use std::fmt;

use tracing::debug;

use crate::error::SearchErrorKind;

/// Why an attempt stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Routing,
    DegenerateRoute,
    Search(SearchErrorKind),
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    RouteRequested,
    RouteReady,
    SearchRequested,
    Completed,
    Failed(FailureReason),
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Completed | SearchState::Failed(_))
    }

    /// Transitions allowed by the search pipeline.
    pub fn can_advance_to(&self, next: &SearchState) -> bool {
        use SearchState::*;
        matches!(
            (self, next),
            (Idle, RouteRequested)
                | (RouteRequested, RouteReady)
                | (RouteRequested, Failed(_))
                | (RouteReady, SearchRequested)
                | (RouteReady, Failed(_))
                | (SearchRequested, Completed)
                | (SearchRequested, Failed(_))
        )
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchState::Idle => write!(f, "idle"),
            SearchState::RouteRequested => write!(f, "route-requested"),
            SearchState::RouteReady => write!(f, "route-ready"),
            SearchState::SearchRequested => write!(f, "search-requested"),
            SearchState::Completed => write!(f, "completed"),
            SearchState::Failed(reason) => write!(f, "failed({:?})", reason),
        }
    }
}

/// One run of the pipeline, tagged with the generation it belongs to.
#[derive(Debug)]
pub struct SearchAttempt {
    generation: u64,
    state: SearchState,
    history: Vec<SearchState>,
}

impl SearchAttempt {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            state: SearchState::Idle,
            history: vec![SearchState::Idle],
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn history(&self) -> &[SearchState] {
        &self.history
    }

    /// Moves to `next`. Illegal transitions are ignored and reported as
    /// `false`; the attempt keeps its current state.
    pub fn advance(&mut self, next: SearchState) -> bool {
        if !self.state.can_advance_to(&next) {
            debug!(
                generation = self.generation,
                from = %self.state,
                to = %next,
                "ignoring illegal search transition"
            );
            return false;
        }
        debug!(generation = self.generation, from = %self.state, to = %next, "search transition");
        self.state = next;
        self.history.push(next);
        true
    }

    pub fn fail(&mut self, reason: FailureReason) -> bool {
        self.advance(SearchState::Failed(reason))
    }
}
