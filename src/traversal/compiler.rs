//! Script compiler.
//!
//! Renders a [`StepQueue`] as Gremlin-Groovy text:
//!
//! ```text
//! g.V().hasLabel('person').repeat(out('knows')).limit(2)
//! ```
//!
//! Compilation is pure and never fails. Step names and arity are not
//! checked. String literals are wrapped in single quotes without escaping,
//! so callers must not pass values containing `'`. Floats are written as
//! plain decimals (`2.0`, never `2e21`); NaN and the infinities become the
//! `Double` constants Groovy understands.

use std::fmt::Write;

use super::step::{Argument, Scalar, Step, StepQueue, VertexRef};

/// Traversal source identifier every compiled script starts with.
pub const TRAVERSAL_SOURCE: &str = "g";

/// Compile a queue into a script rooted at the traversal source.
pub fn compile(queue: &StepQueue) -> String {
    let mut script = String::from(TRAVERSAL_SOURCE);
    for step in queue {
        script.push('.');
        write_step(&mut script, step);
    }
    script
}

/// Compile a queue as a bare call chain, used for nested traversals.
pub fn compile_anonymous(queue: &StepQueue) -> String {
    let mut script = String::new();
    write_chain(&mut script, queue);
    script
}

fn write_chain(out: &mut String, queue: &StepQueue) {
    for (i, step) in queue.steps().iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_step(out, step);
    }
}

fn write_step(out: &mut String, step: &Step) {
    out.push_str(step.operation());
    out.push('(');
    for (i, arg) in step.args().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_argument(out, arg);
    }
    out.push(')');
}

fn write_argument(out: &mut String, arg: &Argument) {
    match arg {
        Argument::Scalar(scalar) => write_scalar(out, scalar),
        Argument::VertexRef(VertexRef { id }) => {
            out.push_str("V(");
            write_scalar(out, id);
            out.push(')');
        }
        Argument::SubTraversal(queue) => write_chain(out, queue),
        Argument::NamedStep(step) => write_step(out, step),
    }
}

fn write_scalar(out: &mut String, scalar: &Scalar) {
    // Writing into a String cannot fail.
    let _ = match scalar {
        Scalar::Int(i) => write!(out, "{}", i),
        Scalar::Float(f) => Ok(write_float(out, *f)),
        Scalar::Str(s) => write!(out, "'{}'", s),
        Scalar::Bool(b) => write!(out, "'{}'", b),
    };
}

fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("Double.NaN");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "Double.POSITIVE_INFINITY" } else { "Double.NEGATIVE_INFINITY" });
    } else {
        // Display never uses exponent notation
        let start = out.len();
        let _ = write!(out, "{}", f);
        if !out[start..].contains('.') {
            out.push_str(".0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::{anonymous, g, v};
    use crate::traversal::predicate::{gt, within};

    #[test]
    fn test_compile_empty_traversal() {
        assert_eq!(compile(&g()), "g");
        assert_eq!(compile_anonymous(&anonymous()), "");
    }

    #[test]
    fn test_compile_start_step() {
        assert_eq!(compile(&g().v(())), "g.V()");
        assert_eq!(compile(&g().v(1)), "g.V(1)");
        assert_eq!(compile(&g().v([1, 2])), "g.V(1, 2)");
        assert_eq!(compile(&g().e("e1")), "g.E('e1')");
    }

    #[test]
    fn test_compile_scalars() {
        let queue = g().inject((1, 2.5, "x", true));
        assert_eq!(compile(&queue), "g.inject(1, 2.5, 'x', 'true')");
    }

    #[test]
    fn test_compile_chain_in_order() {
        let queue = g()
            .v(())
            .has_label("person")
            .has(("name", "marko"))
            .out("knows")
            .values("name")
            .to_list();
        let script = compile(&queue);
        assert_eq!(
            script,
            "g.V().hasLabel('person').has('name', 'marko').out('knows').values('name').toList()"
        );

        let calls: Vec<&str> = script.split(").").collect();
        assert_eq!(calls.len(), queue.len());
    }

    #[test]
    fn test_step_count_matches_calls() {
        let queue = g().v(()).out(()).in_(()).both(()).dedup(()).count(());
        let script = compile(&queue);
        let top_level = script.trim_start_matches("g.").split(").").count();
        assert_eq!(top_level, queue.len());
    }

    #[test]
    fn test_compile_vertex_ref() {
        let queue = g().add_e("knows").from(v(1)).to(v(2));
        assert_eq!(compile(&queue), "g.addE('knows').from(V(1)).to(V(2))");

        let queue = g().add_e("knows").from(v("a"));
        assert_eq!(compile(&queue), "g.addE('knows').from(V('a'))");
    }

    #[test]
    fn test_compile_sub_traversal() {
        let queue = g()
            .v(1)
            .repeat(anonymous().out("knows").has_label("person"))
            .times(2)
            .values("name");
        assert_eq!(
            compile(&queue),
            "g.V(1).repeat(out('knows').hasLabel('person')).times(2).values('name')"
        );
    }

    #[test]
    fn test_nested_sub_traversals() {
        let queue = g().v(()).where_(anonymous().and((anonymous().out(()), anonymous().in_("a"))));
        assert_eq!(compile(&queue), "g.V().where(and(out(), in('a')))");
    }

    #[test]
    fn test_sub_traversal_unaffected_by_other_queue() {
        let inner = anonymous().out("knows");
        let queue = g().v(()).repeat(inner.clone());
        let before = compile(&queue);

        let _other = inner.out("created").count(());
        assert_eq!(compile(&queue), before);
        assert_eq!(before, "g.V().repeat(out('knows'))");
    }

    #[test]
    fn test_compile_named_steps() {
        let queue = g().v(()).has(("age", gt(30))).has(("name", within(["marko", "josh"])));
        assert_eq!(
            compile(&queue),
            "g.V().has('age', gt(30)).has('name', within('marko', 'josh'))"
        );
    }

    #[test]
    fn test_quotes_are_not_escaped() {
        let queue = g().v(()).has(("name", "o'brien"));
        assert_eq!(compile(&queue), "g.V().has('name', 'o'brien')");
    }

    #[test]
    fn test_display_compiles() {
        let queue = g().v(()).limit(3);
        assert_eq!(queue.to_string(), "g.V().limit(3)");
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(compile(&g().inject(1.5)), "g.inject(1.5)");
        assert_eq!(compile(&g().inject(2.0)), "g.inject(2.0)");
        assert_eq!(compile(&g().inject(-0.25)), "g.inject(-0.25)");
        assert_eq!(compile(&g().inject(1e21)), "g.inject(1000000000000000000000.0)");
        assert_eq!(compile(&g().inject(f64::NAN)), "g.inject(Double.NaN)");
        assert_eq!(compile(&g().inject(f64::INFINITY)), "g.inject(Double.POSITIVE_INFINITY)");
        assert_eq!(
            compile(&g().inject(f64::NEG_INFINITY)),
            "g.inject(Double.NEGATIVE_INFINITY)"
        );
    }
}
