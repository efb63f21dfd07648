use super::graphid::Graphid;

/// Declarative selection of a subset of vertices
///
/// The only supported variant selects by an explicit identifier set.
/// Evaluation has set semantics: duplicate identifiers in the input select a
/// vertex at most once, and identifiers with no stored vertex are silently
/// omitted from the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexQuery {
    /// Select the vertices whose identifier is in the given set
    Vertices { ids: Vec<Graphid> },
}

impl VertexQuery {
    /// Build an identifier-set query
    pub fn vertices(ids: impl IntoIterator<Item = Graphid>) -> Self {
        Self::Vertices {
            ids: ids.into_iter().collect(),
        }
    }

    /// Identifiers requested by this query
    pub fn ids(&self) -> &[Graphid] {
        match self {
            Self::Vertices { ids } => ids,
        }
    }
}
