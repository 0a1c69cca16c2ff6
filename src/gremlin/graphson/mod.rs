//! GraphSON 3.0 serialization.
//!
//! GraphSON wraps every value whose JSON form would be ambiguous in a
//! self-describing envelope:
//!
//! ```text
//! {"@type": "g:Int64", "@value": 42}
//! ```
//!
//! # Supported Tags
//!
//! - **Collections**: `g:List`, `g:Set`, `g:Map`, `g:BulkSet`
//! - **Numbers**: `g:Int32`, `g:Int64`, `g:Float`, `g:Double`
//! - **Temporal**: `g:Date`, `g:Timestamp` (epoch microseconds)
//! - **Graph**: `g:Vertex`, `g:Edge`, `g:VertexProperty`, `g:Property`, `g:Path`
//! - **Misc**: `g:UUID`, `g:T`, `g:Direction`, `g:Traverser`
//!
//! Tags without a handler are decoded structurally from their payload.

pub mod decoder;
pub mod types;

pub use decoder::{decode, default_decoder, DecodeFn, GraphSONDecoder};
pub use types::{tag, tagged, untag, TaggedValue, TYPE_KEY, VALUE_KEY};
