//! Predicate helpers.
//!
//! Predicates are steps used as argument expressions and render as bare
//! calls, e.g. `has('age', gt(30))`.

use super::step::{Args, Argument, Scalar, Step};

fn predicate(operation: &str, args: impl Into<Args>) -> Step {
    Step::new(operation, args)
}

fn range_args(low: impl Into<Scalar>, high: impl Into<Scalar>) -> Args {
    Args::none()
        .push(Argument::Scalar(low.into()))
        .push(Argument::Scalar(high.into()))
}

/// `eq(value)`
pub fn eq(value: impl Into<Argument>) -> Step {
    predicate("eq", Args::none().push(value))
}

/// `neq(value)`
pub fn neq(value: impl Into<Argument>) -> Step {
    predicate("neq", Args::none().push(value))
}

/// `lt(value)`
pub fn lt(value: impl Into<Argument>) -> Step {
    predicate("lt", Args::none().push(value))
}

/// `lte(value)`
pub fn lte(value: impl Into<Argument>) -> Step {
    predicate("lte", Args::none().push(value))
}

/// `gt(value)`
pub fn gt(value: impl Into<Argument>) -> Step {
    predicate("gt", Args::none().push(value))
}

/// `gte(value)`
pub fn gte(value: impl Into<Argument>) -> Step {
    predicate("gte", Args::none().push(value))
}

/// `inside(low, high)`, exclusive bounds
pub fn inside(low: impl Into<Scalar>, high: impl Into<Scalar>) -> Step {
    predicate("inside", range_args(low, high))
}

/// `outside(low, high)`
pub fn outside(low: impl Into<Scalar>, high: impl Into<Scalar>) -> Step {
    predicate("outside", range_args(low, high))
}

/// `between(low, high)`, low inclusive and high exclusive
pub fn between(low: impl Into<Scalar>, high: impl Into<Scalar>) -> Step {
    predicate("between", range_args(low, high))
}

/// `within(values..)`
pub fn within(values: impl Into<Args>) -> Step {
    predicate("within", values)
}

/// `without(values..)`
pub fn without(values: impl Into<Args>) -> Step {
    predicate("without", values)
}

/// `startingWith(prefix)`
pub fn starting_with(prefix: impl Into<String>) -> Step {
    predicate("startingWith", Scalar::Str(prefix.into()))
}

/// `endingWith(suffix)`
pub fn ending_with(suffix: impl Into<String>) -> Step {
    predicate("endingWith", Scalar::Str(suffix.into()))
}

/// `containing(text)`
pub fn containing(text: impl Into<String>) -> Step {
    predicate("containing", Scalar::Str(text.into()))
}
