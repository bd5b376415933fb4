//! The collaborator-facing dataset ingest schema (`spec.md` §6).
//!
//! The browser UI owns fetching and caching dataset files; the core only
//! deserializes the already-parsed JSON shape below and validates it at the
//! boundary before handing back a frozen [`Graph`]. Nothing downstream of
//! [`DatasetJson::into_graph`] ever sees the wire format again.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use crate::error::{Error, InvalidInputReason};
use crate::graph::{Graph, GraphBuilder, VertexId};

/// Attribution and licensing metadata, carried through unvalidated: it has
/// no bearing on graph structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetMeta {
    pub id: String,
    pub name: String,
    #[serde(rename = "sourceUrl", default)]
    pub source_url: Option<String>,
    #[serde(rename = "licenseName", default)]
    pub license_name: Option<String>,
    #[serde(rename = "licenseUrl", default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Optional geographic coordinates, one entry per node, carried alongside
/// the graph rather than through it (`spec.md` §6: the core is combinatorial
/// except where geometry is explicit, and graph layout is not geographic
/// projection — see `spec.md` §1 Non-goals).
#[derive(Debug, Clone, Deserialize)]
pub struct Geographic {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetExtras {
    #[serde(default)]
    pub geographic: Option<Geographic>,
}

/// The wire shape itself: node labels, 0-based edge endpoint pairs, and
/// optional extras. Generic over the label type so callers can ingest
/// string-labeled, integer-labeled, or unit-labeled datasets without this
/// module committing to one.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetJson<L> {
    pub meta: DatasetMeta,
    pub nodes: Vec<L>,
    pub edges: Vec<[i64; 2]>,
    #[serde(default)]
    pub extras: Option<DatasetExtras>,
}

/// Per-node geographic coordinates, once validated against `nodes.len()`.
pub type GeographicCoords = Vec<(f64, f64)>;

impl<L> DatasetJson<L> {
    /// Validate this payload against `spec.md` §6's boundary rules and
    /// freeze it into a [`Graph`]:
    /// - every edge endpoint must be a valid 0-based node index;
    /// - self-loops (`u == v`) are rejected, not silently dropped;
    /// - a `geographic` extra must supply one `x`/`y` pair per node;
    /// - edges are normalised to `[min(u,v), max(u,v)]`, deduplicated, and
    ///   sorted lexicographically before being added to the graph, so two
    ///   datasets differing only in edge-array order produce the same
    ///   [`Graph`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] with a
    /// [`InvalidInputReason::MalformedDataset`] detail describing which
    /// rule was violated.
    pub fn into_graph(self) -> Result<(Graph<L>, DatasetMeta, Option<GeographicCoords>), Error> {
        let n = self.nodes.len();

        if let Some(geo) = self.extras.as_ref().and_then(|e| e.geographic.as_ref()) {
            if geo.x.len() != n || geo.y.len() != n {
                return Err(Error::InvalidInput(InvalidInputReason::MalformedDataset(
                    "geographic coordinate arrays must have one entry per node",
                )));
            }
        }

        let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(self.edges.len());
        for &[u, v] in &self.edges {
            if u < 0 || v < 0 || (u as usize) >= n || (v as usize) >= n {
                return Err(Error::InvalidInput(InvalidInputReason::MalformedDataset(
                    "edge endpoint is out of range for the node list",
                )));
            }
            if u == v {
                return Err(Error::InvalidInput(InvalidInputReason::MalformedDataset(
                    "self-loops are rejected at the dataset boundary",
                )));
            }
            let (a, b) = (u as u32, v as u32);
            pairs.push(if a <= b { (a, b) } else { (b, a) });
        }
        pairs.sort_unstable();
        pairs.dedup();

        let mut builder: GraphBuilder<L> = GraphBuilder::with_capacity(n, pairs.len());
        for label in self.nodes {
            builder.add_vertex(label);
        }
        for (a, b) in &pairs {
            builder
                .add_edge(VertexId(*a), VertexId(*b), false)
                .expect("edge endpoints were validated against the node count above");
        }
        let graph = builder.build();

        let geographic = self
            .extras
            .and_then(|e| e.geographic)
            .map(|geo| geo.x.into_iter().zip(geo.y).collect());

        Ok((graph, self.meta, geographic))
    }
}
