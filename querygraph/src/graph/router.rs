//! Routers: pure functions from state to one label of a closed, declared set.
//!
//! A router never mutates state. Its label set is declared up front so that
//! `StateGraph::compile` can check that every label has a target (and that the path
//! map has no label the router can never produce).
//!
//! Label enums implement [`RouteLabel`] and are turned into routers with
//! [`LabelRouter`]; [`HaltRouter`] is the built-in router that sends a run to END
//! when the `error` field is set.

use std::fmt;
use std::marker::PhantomData;

use crate::state::State;

/// Routing predicate attached to a node's outgoing conditional edge.
///
/// **Interaction**: Registered with `StateGraph::add_conditional_edges` together with a
/// label → target map; called by the executor with the post-merge state.
pub trait Router: Send + Sync {
    /// Every label `route` can return.
    fn labels(&self) -> Vec<&'static str>;

    /// Picks a label for the current state. Must be deterministic in `state`.
    fn route(&self, state: &State) -> &'static str;
}

/// Closed label set, usually a fieldless enum.
pub trait RouteLabel: Copy + Send + Sync + 'static {
    /// All variants, in declaration order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
}

/// Router over a [`RouteLabel`] enum; the label set comes from `L::ALL`.
pub struct LabelRouter<L, F> {
    f: F,
    _label: PhantomData<fn() -> L>,
}

impl<L, F> LabelRouter<L, F>
where
    L: RouteLabel,
    F: Fn(&State) -> L + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _label: PhantomData,
        }
    }
}

impl<L, F> Router for LabelRouter<L, F>
where
    L: RouteLabel,
    F: Fn(&State) -> L + Send + Sync,
{
    fn labels(&self) -> Vec<&'static str> {
        L::ALL.iter().map(RouteLabel::as_str).collect()
    }

    fn route(&self, state: &State) -> &'static str {
        (self.f)(state).as_str()
    }
}

/// Router over an explicit label list and a closure returning one of them.
///
/// The closure is not checked against the list at build time; an undeclared label
/// surfaces as a run-time routing fault.
pub struct FnRouter<F> {
    labels: Vec<&'static str>,
    f: F,
}

impl<F> FnRouter<F>
where
    F: Fn(&State) -> &'static str + Send + Sync,
{
    pub fn new(labels: &[&'static str], f: F) -> Self {
        Self {
            labels: labels.to_vec(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnRouter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRouter")
            .field("labels", &self.labels)
            .finish()
    }
}

impl<F> Router for FnRouter<F>
where
    F: Fn(&State) -> &'static str + Send + Sync,
{
    fn labels(&self) -> Vec<&'static str> {
        self.labels.clone()
    }

    fn route(&self, state: &State) -> &'static str {
        (self.f)(state)
    }
}

/// Labels of [`HaltRouter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltLabel {
    /// `error` is set; usually mapped to END.
    Halt,
    /// `error` is unset; usually mapped to the next stage.
    Continue,
}

impl RouteLabel for HaltLabel {
    const ALL: &'static [Self] = &[HaltLabel::Halt, HaltLabel::Continue];

    fn as_str(&self) -> &'static str {
        match self {
            HaltLabel::Halt => "halt",
            HaltLabel::Continue => "continue",
        }
    }
}

/// Short-circuit router: `halt` when the state's `error` field is set, else `continue`.
///
/// Halting is never implicit in the executor; wire this after any node whose failure
/// should end the run.
#[derive(Clone, Copy, Debug, Default)]
pub struct HaltRouter;

impl HaltRouter {
    pub fn label(state: &State) -> HaltLabel {
        if state.has_error() {
            HaltLabel::Halt
        } else {
            HaltLabel::Continue
        }
    }
}

impl Router for HaltRouter {
    fn labels(&self) -> Vec<&'static str> {
        HaltLabel::ALL.iter().map(RouteLabel::as_str).collect()
    }

    fn route(&self, state: &State) -> &'static str {
        Self::label(state).as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PartialState;
    use serde_json::json;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Parity {
        Even,
        Odd,
    }

    impl RouteLabel for Parity {
        const ALL: &'static [Self] = &[Parity::Even, Parity::Odd];
        fn as_str(&self) -> &'static str {
            match self {
                Parity::Even => "even",
                Parity::Odd => "odd",
            }
        }
    }

    fn state_with_n(n: i64) -> State {
        State::from_partial(PartialState::new().with("n", json!(n)))
    }

    /// **Scenario**: LabelRouter declares every enum variant and maps state to a variant.
    #[test]
    fn label_router_declares_all_variants() {
        let router = LabelRouter::new(|s: &State| {
            let n = s.get_as::<i64>("n").ok().flatten().unwrap_or(0);
            if n % 2 == 0 {
                Parity::Even
            } else {
                Parity::Odd
            }
        });
        assert_eq!(router.labels(), vec!["even", "odd"]);
        assert_eq!(router.route(&state_with_n(4)), "even");
        assert_eq!(router.route(&state_with_n(7)), "odd");
    }

    /// **Scenario**: A router returns the same label for an identical state, every time.
    #[test]
    fn routing_is_deterministic() {
        let router = HaltRouter;
        let state = State::from_partial(PartialState::error("boom"));
        let first = router.route(&state);
        for _ in 0..100 {
            assert_eq!(router.route(&state.clone()), first);
        }
    }

    /// **Scenario**: HaltRouter returns halt only when error is set.
    #[test]
    fn halt_router_checks_error_field() {
        let router = HaltRouter;
        assert_eq!(router.labels(), vec!["halt", "continue"]);
        assert_eq!(router.route(&State::new()), "continue");
        let failed = State::from_partial(PartialState::error("unparseable"));
        assert_eq!(router.route(&failed), "halt");
    }

    #[test]
    fn fn_router_uses_declared_labels() {
        let router = FnRouter::new(&["a", "b"], |_s: &State| "b");
        assert_eq!(router.labels(), vec!["a", "b"]);
        assert_eq!(router.route(&State::new()), "b");
    }
}
