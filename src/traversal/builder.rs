//! Fluent traversal builder.
//!
//! Every step method consumes the queue, appends one [`Step`] and returns the
//! queue, so a traversal is written as a single expression:
//!
//! ```
//! use gremlin_driver::traversal::{anonymous, g};
//!
//! let query = g()
//!     .v(1)
//!     .repeat(anonymous().out("knows"))
//!     .times(2)
//!     .values("name");
//!
//! assert_eq!(query.to_string(), "g.V(1).repeat(out('knows')).times(2).values('name')");
//! ```
//!
//! Rust keywords are suffixed with an underscore (`in_`, `as_`, `where_`).

use super::step::{Args, Step, StepQueue, VertexRef};
use super::Scalar;

/// Start a traversal from the `g` source.
pub fn g() -> StepQueue {
    StepQueue::new()
}

/// Start an anonymous traversal, to be embedded as a step argument.
pub fn anonymous() -> StepQueue {
    StepQueue::new()
}

/// Reference a vertex by id outside of a traversal, e.g. `addE(..).from(V(1))`.
pub fn v(id: impl Into<Scalar>) -> VertexRef {
    VertexRef::new(id)
}

macro_rules! steps {
    ($($(#[$meta:meta])* $name:ident => $op:literal;)*) => {
        impl StepQueue {
            $(
                $(#[$meta])*
                pub fn $name(self, args: impl Into<Args>) -> Self {
                    self.call($op, args)
                }
            )*
        }
    };
}

macro_rules! terminal_steps {
    ($($(#[$meta:meta])* $name:ident => $op:literal;)*) => {
        impl StepQueue {
            $(
                $(#[$meta])*
                pub fn $name(self) -> Self {
                    self.call($op, ())
                }
            )*
        }
    };
}

impl StepQueue {
    /// Append an arbitrary step.
    ///
    /// Used by every named step method; also the escape hatch for steps
    /// without a dedicated method.
    pub fn call(self, operation: impl Into<String>, args: impl Into<Args>) -> Self {
        self.push(Step::new(operation, args))
    }

    /// `limit(n)`
    pub fn limit(self, n: i64) -> Self {
        self.call("limit", n)
    }

    /// `times(n)`
    pub fn times(self, n: i64) -> Self {
        self.call("times", n)
    }

    /// `range(low, high)`
    pub fn range(self, low: i64, high: i64) -> Self {
        self.call("range", (low, high))
    }

    /// `skip(n)`
    pub fn skip(self, n: i64) -> Self {
        self.call("skip", n)
    }

    /// `repeat(traversal)`
    pub fn repeat(self, traversal: StepQueue) -> Self {
        self.call("repeat", traversal)
    }
}

steps! {
    // Start and selection
    /// `V(ids..)`: start from, or move to, vertices
    v => "V";
    /// `E(ids..)`: start from, or move to, edges
    e => "E";
    /// `inject(values..)`
    inject => "inject";

    // Mutation
    /// `addV(label)`
    add_v => "addV";
    /// `addE(label)`
    add_e => "addE";
    /// `property(key, value)`
    property => "property";
    /// `from(vertex)`
    from => "from";
    /// `to(vertex)`
    to => "to";

    // Filters
    /// `has(key, value)` or `has(key, predicate)`
    has => "has";
    /// `hasLabel(labels..)`
    has_label => "hasLabel";
    /// `hasId(ids..)`
    has_id => "hasId";
    /// `hasKey(keys..)`
    has_key => "hasKey";
    /// `hasNot(key)`
    has_not => "hasNot";
    /// `and(traversals..)`
    and => "and";
    /// `or(traversals..)`
    or => "or";
    /// `not(traversal)`
    not => "not";
    /// `is(value)`
    is => "is";
    /// `where(traversal)`
    where_ => "where";
    /// `dedup(labels..)`
    dedup => "dedup";
    /// `simplePath()`
    simple_path => "simplePath";
    /// `cyclicPath()`
    cyclic_path => "cyclicPath";
    /// `tail(n)`
    tail => "tail";

    // Navigation
    /// `out(labels..)`
    out => "out";
    /// `in(labels..)`
    in_ => "in";
    /// `both(labels..)`
    both => "both";
    /// `outE(labels..)`
    out_e => "outE";
    /// `inE(labels..)`
    in_e => "inE";
    /// `bothE(labels..)`
    both_e => "bothE";
    /// `outV()`
    out_v => "outV";
    /// `inV()`
    in_v => "inV";
    /// `bothV()`
    both_v => "bothV";
    /// `otherV()`
    other_v => "otherV";

    // Projection
    /// `values(keys..)`
    values => "values";
    /// `valueMap(keys..)`
    value_map => "valueMap";
    /// `properties(keys..)`
    properties => "properties";
    /// `id()`
    id => "id";
    /// `label()`
    label => "label";
    /// `key()`
    key => "key";
    /// `value()`
    value => "value";
    /// `select(labels..)`
    select => "select";
    /// `as(labels..)`
    as_ => "as";
    /// `path()`
    path => "path";
    /// `constant(value)`
    constant => "constant";
    /// `by(key or traversal)`
    by => "by";

    // Branching and looping
    /// `emit(traversal?)`
    emit => "emit";
    /// `until(traversal)`
    until => "until";
    /// `loops()`
    loops => "loops";
    /// `coalesce(traversals..)`
    coalesce => "coalesce";
    /// `union(traversals..)`
    union => "union";
    /// `optional(traversal)`
    optional => "optional";
    /// `identity()`
    identity => "identity";

    // Aggregation
    /// `count()`
    count => "count";
    /// `fold()`
    fold => "fold";
    /// `unfold()`
    unfold => "unfold";
    /// `groupCount()`
    group_count => "groupCount";
    /// `order()`
    order => "order";
    /// `sideEffect(traversal)`
    side_effect => "sideEffect";
    /// `aggregate(label)`
    aggregate => "aggregate";
    /// `sum()`
    sum => "sum";
    /// `min()`
    min => "min";
    /// `max()`
    max => "max";
    /// `mean()`
    mean => "mean";
}

terminal_steps! {
    /// `next()`
    next => "next";
    /// `tryNext()`
    try_next => "tryNext";
    /// `hasNext()`
    has_next => "hasNext";
    /// `toList()`
    to_list => "toList";
    /// `toSet()`
    to_set => "toSet";
    /// `toBulkSet()`
    to_bulk_set => "toBulkSet";
    /// `iterate()`
    iterate => "iterate";
    /// `drop()`
    drop => "drop";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::{Argument, Scalar};

    fn ops(queue: &StepQueue) -> Vec<&str> {
        queue.steps().iter().map(Step::operation).collect()
    }

    #[test]
    fn test_g_and_anonymous_start_empty() {
        assert!(g().is_empty());
        assert!(anonymous().is_empty());
    }

    #[test]
    fn test_each_step_appends_once() {
        let queue = g().add_v("person").property(("name", "marko")).next();
        assert_eq!(ops(&queue), vec!["addV", "property", "next"]);
    }

    #[test]
    fn test_keyword_steps_use_gremlin_names() {
        let queue = anonymous()
            .in_(())
            .as_("a")
            .where_(anonymous().out(()))
            .and(())
            .or(())
            .in_e(())
            .out_v(())
            .other_v(());
        assert_eq!(
            ops(&queue),
            vec!["in", "as", "where", "and", "or", "inE", "outV", "otherV"]
        );
    }

    #[test]
    fn test_terminal_steps() {
        let queue = g()
            .v(())
            .try_next()
            .has_next()
            .to_list()
            .to_set()
            .to_bulk_set()
            .iterate()
            .drop();
        assert_eq!(
            ops(&queue),
            vec!["V", "tryNext", "hasNext", "toList", "toSet", "toBulkSet", "iterate", "drop"]
        );
        assert!(queue.steps()[1].args().is_empty());
    }

    #[test]
    fn test_v_as_step_and_as_value() {
        let step = g().v(7);
        assert_eq!(step.steps()[0].operation(), "V");
        assert_eq!(step.steps()[0].args(), &[Argument::Scalar(Scalar::Int(7))]);

        let reference = v(7);
        assert_eq!(reference.id, Scalar::Int(7));
    }

    #[test]
    fn test_repeat_keeps_sub_traversal_nested() {
        let queue = g().v(()).repeat(anonymous().out(()).out(())).emit(());
        assert_eq!(queue.len(), 3);
        match &queue.steps()[1].args()[0] {
            Argument::SubTraversal(inner) => assert_eq!(inner.len(), 2),
            other => panic!("unexpected argument {:?}", other),
        }
    }

    #[test]
    fn test_numeric_steps() {
        let queue = g().v(()).range(1, 3).skip(1).limit(2).times(4);
        assert_eq!(queue.to_string(), "g.V().range(1, 3).skip(1).limit(2).times(4)");
    }

    #[test]
    fn test_generic_call() {
        let queue = g().v(()).call("shortestPath", ()).call("with", ("~tinkerpop.shortestPath.target", 5));
        assert_eq!(
            queue.to_string(),
            "g.V().shortestPath().with('~tinkerpop.shortestPath.target', 5)"
        );
    }
}
