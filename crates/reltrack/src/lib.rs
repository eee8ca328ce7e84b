//! Entity registry and typed relation index.
//!
//! Tracks named entities and directed, typed edges between them, and
//! answers "for each relation type in use, which destinations receive the
//! most distinct incoming edges, and how many".
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Graph                                                       │
//! │    - EntityRegistry: OrderedMap<Name, ()>                    │
//! │    - RelationIndex:  relation → destination → source         │
//! │        per relation:    maximum live count                   │
//! │        per destination: live count (= number of sources)     │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Report: ascending walk, leaders of every relation           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use reltrack::{Graph, Name};
//!
//! let mut graph = Graph::new();
//! for name in ["a", "b", "c"] {
//!     graph.add_entity(&Name::from(name));
//! }
//! graph.add_edge(&Name::from("a"), &Name::from("b"), &Name::from("r1"));
//! graph.add_edge(&Name::from("c"), &Name::from("b"), &Name::from("r1"));
//! assert_eq!(graph.report().to_string(), "r1 b 2;");
//!
//! graph.remove_entity(&Name::from("b"));
//! assert_eq!(graph.report().to_string(), "none");
//! ```

mod graph;
mod index;
mod name;
mod registry;
mod report;

pub use graph::Graph;
pub use index::{Destination, Relation, RelationIndex};
pub use name::{MAX_NAME_LEN, Name};
pub use registry::EntityRegistry;
pub use report::{EMPTY_REPORT, Report, ReportGroup};
