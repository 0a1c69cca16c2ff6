//! Steps and step queues.
//!
//! A [`StepQueue`] is the intermediate representation of a traversal: an
//! ordered list of `(operation, arguments)` pairs. Queues have value
//! semantics, so a queue embedded as a [`Argument::SubTraversal`] is owned by
//! the step that carries it and cannot be changed through another handle.

use std::fmt;

/// Literal argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Integer, rendered in decimal
    Int(i64),
    /// Float, rendered in decimal
    Float(f64),
    /// String, rendered single-quoted
    Str(String),
    /// Boolean, rendered single-quoted
    Bool(bool),
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v as $conv)
                }
            }
        )*
    };
}

scalar_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float as f64,
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Scalar::Str(v.clone())
    }
}

/// Reference to a vertex by id, rendered as `V(<id>)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRef {
    /// Vertex id
    pub id: Scalar,
}

impl VertexRef {
    /// Create a vertex reference.
    pub fn new(id: impl Into<Scalar>) -> Self {
        Self { id: id.into() }
    }
}

/// A single traversal step.
///
/// Fields are private: a step cannot be changed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    operation: String,
    args: Vec<Argument>,
}

impl Step {
    /// Create a step.
    pub fn new(operation: impl Into<String>, args: impl Into<Args>) -> Self {
        Self {
            operation: operation.into(),
            args: args.into().0,
        }
    }

    /// Operation name, e.g. `hasLabel`.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Arguments in order.
    pub fn args(&self) -> &[Argument] {
        &self.args
    }
}

/// Step argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Literal value
    Scalar(Scalar),
    /// Vertex selected by id
    VertexRef(VertexRef),
    /// Nested anonymous traversal
    SubTraversal(StepQueue),
    /// Step used as an expression, e.g. a predicate
    NamedStep(Step),
}

impl<T: Into<Scalar>> From<T> for Argument {
    fn from(v: T) -> Self {
        Argument::Scalar(v.into())
    }
}

impl From<VertexRef> for Argument {
    fn from(v: VertexRef) -> Self {
        Argument::VertexRef(v)
    }
}

impl From<StepQueue> for Argument {
    fn from(v: StepQueue) -> Self {
        Argument::SubTraversal(v)
    }
}

impl From<Step> for Argument {
    fn from(v: Step) -> Self {
        Argument::NamedStep(v)
    }
}

/// Argument list accepted by builder methods.
///
/// Converts from `()` (no arguments), a single argument, an array, a `Vec`
/// or a tuple of up to four arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(pub Vec<Argument>);

impl Args {
    /// No arguments.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Append an argument.
    pub fn push(mut self, arg: impl Into<Argument>) -> Self {
        self.0.push(arg.into());
        self
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args::none()
    }
}

impl<T: Into<Argument>> From<T> for Args {
    fn from(v: T) -> Self {
        Args(vec![v.into()])
    }
}

impl<T: Into<Argument>> From<Vec<T>> for Args {
    fn from(v: Vec<T>) -> Self {
        Args(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Argument>, const N: usize> From<[T; N]> for Args {
    fn from(v: [T; N]) -> Self {
        Args(v.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Argument>, B: Into<Argument>> From<(A, B)> for Args {
    fn from((a, b): (A, B)) -> Self {
        Args(vec![a.into(), b.into()])
    }
}

impl<A: Into<Argument>, B: Into<Argument>, C: Into<Argument>> From<(A, B, C)> for Args {
    fn from((a, b, c): (A, B, C)) -> Self {
        Args(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for Args
where
    A: Into<Argument>,
    B: Into<Argument>,
    C: Into<Argument>,
    D: Into<Argument>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Args(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

/// Ordered step sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepQueue {
    steps: Vec<Step>,
}

impl StepQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step and return the queue.
    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps in insertion order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no steps were added.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl IntoIterator for StepQueue {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a StepQueue {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for StepQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::compiler::compile(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::from(3), Scalar::Int(3));
        assert_eq!(Scalar::from(3u32), Scalar::Int(3));
        assert_eq!(Scalar::from(1.5), Scalar::Float(1.5));
        assert_eq!(Scalar::from("a"), Scalar::Str("a".into()));
        assert_eq!(Scalar::from(true), Scalar::Bool(true));
    }

    #[test]
    fn test_args_conversions() {
        assert!(Args::from(()).0.is_empty());
        assert_eq!(Args::from("knows").0.len(), 1);
        assert_eq!(Args::from(["a", "b", "c"]).0.len(), 3);
        assert_eq!(Args::from(vec![1, 2]).0.len(), 2);
        assert_eq!(
            Args::from(("name", 29)).0,
            vec![
                Argument::Scalar(Scalar::Str("name".into())),
                Argument::Scalar(Scalar::Int(29)),
            ]
        );
        assert_eq!(Args::none().push(1).push("x").0.len(), 2);
    }

    #[test]
    fn test_nested_arguments() {
        let inner = StepQueue::new().push(Step::new("out", "knows"));
        let args = Args::from((VertexRef::new(1), inner.clone()));
        assert!(matches!(args.0[0], Argument::VertexRef(_)));
        assert_eq!(args.0[1], Argument::SubTraversal(inner));
    }

    #[test]
    fn test_queue_is_fifo() {
        let queue = StepQueue::new()
            .push(Step::new("V", ()))
            .push(Step::new("out", ()))
            .push(Step::new("count", ()));

        let ops: Vec<&str> = queue.steps().iter().map(Step::operation).collect();
        assert_eq!(ops, vec!["V", "out", "count"]);
        assert_eq!(queue.len(), 3);
        assert!(!queue.is_empty());
    }

    #[test]
    fn test_embedded_queue_is_a_copy() {
        let inner = StepQueue::new().push(Step::new("out", ()));
        let step = Step::new("repeat", inner.clone());

        let mutated = inner.push(Step::new("in", ()));
        assert_eq!(mutated.len(), 2);

        match &step.args()[0] {
            Argument::SubTraversal(embedded) => assert_eq!(embedded.len(), 1),
            other => panic!("unexpected argument {:?}", other),
        }
    }
}
