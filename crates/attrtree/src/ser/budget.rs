use crate::options::{DEFAULT_MAX_DEPTH, Options};

/// Longest run of `Some`/newtype unwraps allowed without opening a container.
/// Only a reference cycle through pointers alone gets this far.
const MAX_UNWRAP_CHAIN: usize = DEFAULT_MAX_DEPTH;

/// Nesting state carried down by both serializers.
///
/// Containers (sequences, maps, structs, data variants) count toward
/// [`Options::max_depth`]; unwrapping a pointer or newtype does not, so a
/// leaf behind any number of pointers is still classified at the limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget<'a> {
    pub(crate) opts: &'a Options,
    pub(crate) depth: usize,
    chain: usize,
}

impl<'a> Budget<'a> {
    pub(crate) fn new(opts: &'a Options) -> Self {
        Self {
            opts,
            depth: 0,
            chain: 0,
        }
    }

    /// No container may be opened here.
    pub(crate) fn exhausted(&self) -> bool {
        self.opts.max_depth.is_some_and(|max| self.depth >= max)
    }

    /// No further pointer may be followed here.
    pub(crate) fn chain_exhausted(&self) -> bool {
        self.opts.max_depth.is_some() && self.chain >= MAX_UNWRAP_CHAIN
    }

    /// Budget for the members of a container opened at this level.
    pub(crate) fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            chain: 0,
            ..self
        }
    }

    /// Budget for the target of one pointer or newtype.
    pub(crate) fn unwrapped(self) -> Self {
        Self {
            chain: self.chain + 1,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_do_not_consume_depth() {
        let opts = Options::default().with_max_depth(Some(1));
        let b = Budget::new(&opts).unwrapped().unwrapped();
        assert!(!b.exhausted());
        assert!(b.nested().exhausted());
    }

    #[test]
    fn chains_are_bounded_only_when_limited() {
        let limited = Options::default();
        let mut b = Budget::new(&limited);
        for _ in 0..MAX_UNWRAP_CHAIN {
            b = b.unwrapped();
        }
        assert!(b.chain_exhausted());
        assert!(!b.nested().chain_exhausted());

        let unlimited = Options::default().with_max_depth(None);
        let mut b = Budget::new(&unlimited);
        for _ in 0..MAX_UNWRAP_CHAIN {
            b = b.unwrapped();
        }
        assert!(!b.chain_exhausted());
    }
}
