//! # Traversal Builder
//!
//! Builds Gremlin traversals as data and compiles them to script text.
//!
//! ## Overview
//!
//! - [`step`] - Steps, arguments and the [`StepQueue`] they live in
//! - [`builder`] - Fluent step methods and the [`g`] / [`anonymous`] sources
//! - [`predicate`] - Predicates such as `gt(30)` used as step arguments
//! - [`compiler`] - Rendering to Gremlin-Groovy text
//!
//! ## Example
//!
//! ```
//! use gremlin_driver::traversal::{g, predicate::gt, v};
//!
//! let adults = g().v(()).has_label("person").has(("age", gt(18))).values("name");
//! assert_eq!(
//!     adults.to_string(),
//!     "g.V().hasLabel('person').has('age', gt(18)).values('name')"
//! );
//!
//! let edge = g().add_e("knows").from(v(1)).to(v(2));
//! assert_eq!(edge.to_string(), "g.addE('knows').from(V(1)).to(V(2))");
//! ```

pub mod builder;
pub mod compiler;
pub mod predicate;
pub mod step;

pub use builder::{anonymous, g, v};
pub use compiler::{compile, compile_anonymous, TRAVERSAL_SOURCE};
pub use step::{Args, Argument, Scalar, Step, StepQueue, VertexRef};
