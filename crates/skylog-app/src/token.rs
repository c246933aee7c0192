//! Monotonic request tokens for superseding stale async completions.
//!
//! Every flow that can have overlapping requests keeps a `TokenSeries` in
//! its state cell. A request takes a token when it starts; when it finishes
//! it gets applied only if its token is still the latest. There is no
//! cancellation: a superseded request runs to completion and its result is
//! dropped on arrival.

/// Issues monotonically increasing tokens; the newest issue supersedes all
/// earlier ones. Lives inside a state cell so taking a token and recording
/// the matching transition happen under one lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenSeries {
    latest: u64,
}

impl TokenSeries {
    /// Issue the next token, superseding everything issued before it.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// True if `token` is still the most recently issued one.
    pub fn is_current(&self, token: u64) -> bool {
        self.latest == token
    }

    /// Supersede everything in flight without starting a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_monotonically() {
        let mut series = TokenSeries::default();
        let a = series.next();
        let b = series.next();
        let c = series.next();

        assert!(a < b && b < c);
    }

    #[test]
    fn newest_token_supersedes_older_ones() {
        let mut series = TokenSeries::default();
        let a = series.next();
        let b = series.next();

        assert!(!series.is_current(a));
        assert!(series.is_current(b));
    }

    #[test]
    fn invalidate_drops_in_flight_tokens() {
        let mut series = TokenSeries::default();
        let a = series.next();
        series.invalidate();

        assert!(!series.is_current(a));
    }
}
