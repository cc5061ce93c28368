use std::fmt;

/// The outcome of a decision procedure, with evidence either way
pub enum Dec<Y = (), N = ()> {
    Yes(Y),
    No(N),
}

pub use Dec::*;

impl<Y, N> Dec<Y, N> {
    pub fn is_yes(&self) -> bool {
        matches!(self, Yes(_))
    }
}

impl<Y: fmt::Debug, N: fmt::Debug> fmt::Debug for Dec<Y, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes(arg) => f.debug_tuple("Yes").field(arg).finish(),
            Self::No(arg) => f.debug_tuple("No").field(arg).finish(),
        }
    }
}
