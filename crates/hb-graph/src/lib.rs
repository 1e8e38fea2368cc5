//! hb-graph: plant topology for the heat-balance solver.
//!
//! Provides:
//! - Arena graph of units, named ports and streams
//! - Incremental builder that enforces port direction, single feed and
//!   medium compatibility
//! - Deterministic evaluation order with recycle (back edge) detection
//!
//! # Example
//!
//! ```
//! use hb_core::Medium;
//! use hb_graph::{GraphBuilder, PortKind, evaluation_order};
//!
//! let mut builder = GraphBuilder::new();
//! let hrsg = builder.add_unit("HRSG", false).unwrap();
//! let st = builder.add_unit("ST", false).unwrap();
//! let out = builder.add_port(hrsg, "steam_out", PortKind::Outlet, Medium::Steam).unwrap();
//! let inp = builder.add_port(st, "steam_in", PortKind::Inlet, Medium::Steam).unwrap();
//! builder.connect(out, inp).unwrap();
//! let graph = builder.build();
//!
//! let order = evaluation_order(&graph);
//! assert_eq!(order.order, vec![hrsg, st]);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod order;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, Port, PortKind, Stream, UnitNode};
pub use order::{EvaluationOrder, evaluation_order};
