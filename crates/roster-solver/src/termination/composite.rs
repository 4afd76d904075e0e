//! Any-of combination of terminations.

use super::Termination;
use crate::scope::SearchScope;
use crate::stats::TerminationReason;

/// Fires as soon as any child fires.
///
/// Children are a tuple, so the combination is resolved statically. When
/// several children have fired, the earliest in the tuple decides the
/// reported [`TerminationReason`]; put cancellation first so it wins over
/// an expiring budget.
///
/// ```
/// use roster_solver::termination::{NodeCountTermination, OrTermination, TimeTermination};
///
/// let budget = OrTermination((TimeTermination::seconds(30), NodeCountTermination::new(1_000)));
/// # let _ = budget;
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(children: T) -> Self {
        Self(children)
    }
}

macro_rules! impl_any_of {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }

            fn reason(&self, scope: &SearchScope) -> TerminationReason {
                $(
                    if (self.0).$idx.is_terminated(scope) {
                        return (self.0).$idx.reason(scope);
                    }
                )+
                TerminationReason::Exhausted
            }
        }
    };
}

impl_any_of!(0: A);
impl_any_of!(0: A, 1: B);
impl_any_of!(0: A, 1: B, 2: C);
impl_any_of!(0: A, 1: B, 2: C, 3: D);
