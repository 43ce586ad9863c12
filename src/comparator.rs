/// Equivalence oracle used to decide whether a host vertex (or edge) may
/// stand in for a pattern vertex (or edge).
///
/// Vertices are compared by label and edges by multiplicity. Any
/// `Fn(&T, &T) -> bool` closure works as a comparator.
pub trait Equivalence<T: ?Sized> {
    fn equivalent(&self, host: &T, pattern: &T) -> bool;
}

impl<T: ?Sized, F> Equivalence<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equivalent(&self, host: &T, pattern: &T) -> bool {
        self(host, pattern)
    }
}

/// Treats every pair as compatible: plain structural matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEqual;

impl<T: ?Sized> Equivalence<T> for AlwaysEqual {
    fn equivalent(&self, _host: &T, _pattern: &T) -> bool {
        true
    }
}

/// Compatible iff the two values are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl<T: PartialEq + ?Sized> Equivalence<T> for ExactMatch {
    fn equivalent(&self, host: &T, pattern: &T) -> bool {
        host == pattern
    }
}
