//! Error kinds shared across every public entry point.
//!
//! TopoLoom does not pull in `thiserror` or `error-stack`: like the crate it
//! is grounded on, it defines small `enum`s with manual `Display`/`Error`
//! impls (see `petgraph`'s `algo::push_relabel::MaxFlowError` and
//! `acyclic::AcyclicEdgeError` for the pattern this follows).

use core::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// The error kinds documented in the crate's error-handling design.
///
/// Every variant carries enough context to explain *which* input violated
/// *which* precondition; none carry caller data verbatim beyond short
/// `&'static str` hints, so no error can leak arbitrary input content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Malformed endpoints, duplicate vertex ids, or directed input where an
    /// undirected projection is required and `forceUndirected` was not set.
    InvalidInput(InvalidInputReason),
    /// A self-loop or multigraph structure was encountered in a component
    /// that does not support it under the options given.
    UnsupportedInput(UnsupportedInputReason),
    /// An operation that requires a biconnected graph was called on one that
    /// isn't (and no `*_all`/`*_safe` variant was used).
    NotBiconnected,
    /// An operation that requires a planar embedding was called on a graph
    /// for which none is available.
    NonPlanar,
    /// A min-cost-flow instance has no feasible assignment.
    InfeasibleFlow(InfeasibleReason),
    /// A layout pipeline could not produce a legal representation.
    Layout(LayoutError),
    /// An internal invariant was violated; this indicates a bug in TopoLoom
    /// itself rather than a problem with the input.
    InternalInvariantViolation(&'static str),
}

/// Why [`Error::InvalidInput`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputReason {
    /// An edge endpoint index is out of range for the graph's vertex count.
    EndpointOutOfRange,
    /// A directed edge was supplied to an operation that requires an
    /// undirected projection and `forceUndirected` was `false`.
    DirectedEdgeRejected,
    /// A dataset ingest payload failed a boundary validation rule.
    MalformedDataset(&'static str),
}

/// Why [`Error::UnsupportedInput`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedInputReason {
    /// A self-loop was present and `allowSelfLoops` was not `"keep"`.
    SelfLoopKept,
    /// A component that requires a simple graph was given parallel edges.
    ParallelEdges,
}

/// Why [`Error::InfeasibleFlow`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibleReason {
    /// `Σ demands != 0`.
    UnbalancedDemands,
    /// Capacities (after lower-bound shifting) cannot satisfy demands.
    InsufficientCapacity,
    /// A node with nonzero residual demand is unreachable from any node
    /// with residual supply.
    Unreachable,
    /// Summing arc costs and flows would overflow the integer flow type.
    ArithmeticOverflow,
}

/// Why an orthogonal (or other) layout pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A vertex has degree ≥ 5, which the canonical bend-demand model does
    /// not assign a feasible angle sum for.
    HighDegree,
    /// The face-angle min-cost-flow instance used for bend minimisation was
    /// infeasible.
    FlowInfeasible,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Error::UnsupportedInput(reason) => write!(f, "unsupported input: {reason}"),
            Error::NotBiconnected => f.write_str("graph is not biconnected"),
            Error::NonPlanar => f.write_str("no planar embedding is available"),
            Error::InfeasibleFlow(reason) => write!(f, "infeasible flow: {reason}"),
            Error::Layout(inner) => write!(f, "layout error: {inner}"),
            Error::InternalInvariantViolation(detail) => {
                write!(f, "internal invariant violation: {detail}")
            }
        }
    }
}

impl fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInputReason::EndpointOutOfRange => f.write_str("edge endpoint out of range"),
            InvalidInputReason::DirectedEdgeRejected => {
                f.write_str("directed edge rejected (forceUndirected is false)")
            }
            InvalidInputReason::MalformedDataset(detail) => {
                write!(f, "malformed dataset: {detail}")
            }
        }
    }
}

impl fmt::Display for UnsupportedInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedInputReason::SelfLoopKept => f.write_str("self-loop kept but disallowed"),
            UnsupportedInputReason::ParallelEdges => f.write_str("parallel edges disallowed"),
        }
    }
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfeasibleReason::UnbalancedDemands => f.write_str("demands do not sum to zero"),
            InfeasibleReason::InsufficientCapacity => f.write_str("capacities are insufficient"),
            InfeasibleReason::Unreachable => f.write_str("a demanded node is unreachable"),
            InfeasibleReason::ArithmeticOverflow => f.write_str("arithmetic overflow in flow cost"),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::HighDegree => {
                f.write_str("vertex degree >= 5 has no canonical bend assignment")
            }
            LayoutError::FlowInfeasible => f.write_str("bend-minimisation flow was infeasible"),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(value: LayoutError) -> Self {
        Error::Layout(value)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}
