//! Request identity for discarding out-of-order completions.

use std::fmt;

/// Identity of one outbound request.
///
/// Tokens are issued from a strictly increasing counter, so a completion can
/// be matched against the latest request of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens and remembers which one is current.
///
/// Invalidating leaves no token current, so every outstanding completion is
/// treated as stale.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
    current: Option<RequestToken>,
}

impl RequestSequencer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: 0,
            current: None,
        }
    }

    /// Issues a new token and makes it the current one.
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        token
    }

    /// Returns `true` if `token` is the current request and clears it.
    ///
    /// Each token completes at most once.
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if self.current == Some(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Marks every outstanding request stale.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}
