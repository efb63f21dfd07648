/// Core data types for the vertex store
///
/// - Graphid: 64-bit identifier with embedded label and local ID
/// - Label: validated vertex label
/// - Vertex: graph node with properties
/// - VertexQuery: declarative vertex selection

pub mod graphid;
pub mod label;
pub mod query;
pub mod vertex;

pub use graphid::{Graphid, GraphidError};
pub use label::{Label, LabelError};
pub use query::VertexQuery;
pub use vertex::Vertex;
