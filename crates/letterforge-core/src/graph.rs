//! Step registry and graph compiler.
//!
//! `GraphBuilder` collects registered steps and directed edges, validates
//! the result (single entry, every step reachable, terminal reachable from
//! entry), and produces an immutable `Plan`. Uses `petgraph` to model the
//! chain as a directed graph so reachability checks stay a graph traversal
//! rather than hand-rolled bookkeeping.
//!
//! Compilation is pure validation plus indexing; it has no side effects and
//! should run exactly once at startup.

use std::collections::HashMap;

use letterforge_types::step::StepId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

// ---------------------------------------------------------------------------
// Next marker
// ---------------------------------------------------------------------------

/// Where execution goes after a step: another step, or the terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Step(StepId),
    End,
}

// ---------------------------------------------------------------------------
// GraphError
// ---------------------------------------------------------------------------

/// Errors detected while compiling the workflow graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A step was registered more than once.
    #[error("step '{0}' registered twice")]
    DuplicateStep(StepId),

    /// An edge references a step that was never registered.
    #[error("edge references unregistered step '{0}'")]
    UnknownStep(StepId),

    /// A step has more than one outgoing edge.
    #[error("step '{0}' has more than one outgoing edge")]
    DuplicateEdge(StepId),

    /// A registered step has no outgoing edge and is not terminal.
    #[error("step '{0}' has no outgoing edge")]
    MissingEdge(StepId),

    /// No entry step was set.
    #[error("no entry step set")]
    NoEntry,

    /// The entry step is not among the registered steps.
    #[error("entry step '{0}' is not registered")]
    UnknownEntry(StepId),

    /// The terminal marker cannot be reached from the entry step.
    #[error("terminal marker is not reachable from entry")]
    TerminalUnreachable,

    /// A registered step is unreachable from the entry step.
    #[error("step '{0}' is unreachable from entry")]
    Unreachable(StepId),
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// The compiled, immutable execution plan.
///
/// Maps each step to its successor; the engine walks this structure and
/// never consults the builder again.
#[derive(Debug, Clone)]
pub struct Plan {
    entry: StepId,
    next: HashMap<StepId, Next>,
}

impl Plan {
    /// The step execution starts from.
    pub fn entry(&self) -> StepId {
        self.entry
    }

    /// The successor of `step`, or `None` if the step is not in the plan.
    pub fn next(&self, step: StepId) -> Option<Next> {
        self.next.get(&step).copied()
    }

    /// Whether `step` is part of this plan.
    pub fn contains(&self, step: StepId) -> bool {
        self.next.contains_key(&step)
    }

    /// Number of steps in the plan.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Collects step registrations and edges, then compiles them into a `Plan`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    steps: Vec<StepId>,
    edges: Vec<(StepId, Next)>,
    entry: Option<StepId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step. Each step may be registered exactly once.
    pub fn add_step(mut self, step: StepId) -> Self {
        self.steps.push(step);
        self
    }

    /// Add the directed edge `from -> to`.
    pub fn add_edge(mut self, from: StepId, to: Next) -> Self {
        self.edges.push((from, to));
        self
    }

    /// Set the entry step.
    pub fn set_entry(mut self, entry: StepId) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Validate the graph and produce the executable plan.
    pub fn compile(self) -> Result<Plan, GraphError> {
        let entry = self.entry.ok_or(GraphError::NoEntry)?;

        let mut next: HashMap<StepId, Next> = HashMap::new();
        for step in &self.steps {
            if next.insert(*step, Next::End).is_some() {
                return Err(GraphError::DuplicateStep(*step));
            }
        }
        // Registration done; reset placeholder markers so missing edges are
        // detectable below.
        let registered: Vec<StepId> = next.keys().copied().collect();
        next.clear();

        if !registered.contains(&entry) {
            return Err(GraphError::UnknownEntry(entry));
        }

        for (from, to) in &self.edges {
            if !registered.contains(from) {
                return Err(GraphError::UnknownStep(*from));
            }
            if let Next::Step(target) = to {
                if !registered.contains(target) {
                    return Err(GraphError::UnknownStep(*target));
                }
            }
            if next.insert(*from, *to).is_some() {
                return Err(GraphError::DuplicateEdge(*from));
            }
        }

        for step in &registered {
            if !next.contains_key(step) {
                return Err(GraphError::MissingEdge(*step));
            }
        }

        // Build a petgraph view with a dedicated terminal node and walk it
        // from the entry to check reachability of every step and of the
        // terminal marker.
        let mut graph = DiGraph::<Option<StepId>, ()>::new();
        let mut indices: HashMap<StepId, NodeIndex> = HashMap::new();
        for step in &registered {
            indices.insert(*step, graph.add_node(Some(*step)));
        }
        let end_idx = graph.add_node(None);

        for (from, to) in &next {
            let from_idx = indices[from];
            let to_idx = match to {
                Next::Step(target) => indices[target],
                Next::End => end_idx,
            };
            graph.add_edge(from_idx, to_idx, ());
        }

        let mut reached = vec![false; graph.node_count()];
        let mut dfs = Dfs::new(&graph, indices[&entry]);
        while let Some(node) = dfs.next(&graph) {
            reached[node.index()] = true;
        }

        if !reached[end_idx.index()] {
            return Err(GraphError::TerminalUnreachable);
        }
        for (step, idx) in &indices {
            if !reached[idx.index()] {
                return Err(GraphError::Unreachable(*step));
            }
        }

        Ok(Plan { entry, next })
    }
}

// ---------------------------------------------------------------------------
// The canonical letter-generation chain
// ---------------------------------------------------------------------------

/// Compile the letter-generation chain:
/// collect -> validate -> compose_template -> generate_letter ->
/// format_letter -> draft_email -> attach_pdf -> respond -> END.
pub fn letter_plan() -> Result<Plan, GraphError> {
    let mut builder = GraphBuilder::new().set_entry(StepId::Collect);
    for step in StepId::ALL {
        builder = builder.add_step(step);
    }
    builder
        .add_edge(StepId::Collect, Next::Step(StepId::Validate))
        .add_edge(StepId::Validate, Next::Step(StepId::ComposeTemplate))
        .add_edge(StepId::ComposeTemplate, Next::Step(StepId::GenerateLetter))
        .add_edge(StepId::GenerateLetter, Next::Step(StepId::FormatLetter))
        .add_edge(StepId::FormatLetter, Next::Step(StepId::DraftEmail))
        .add_edge(StepId::DraftEmail, Next::Step(StepId::AttachPdf))
        .add_edge(StepId::AttachPdf, Next::Step(StepId::Respond))
        .add_edge(StepId::Respond, Next::End)
        .compile()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
