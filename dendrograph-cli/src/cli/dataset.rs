//! JSON dataset format accepted by the `layout` command.

use dendrograph_core::{LeafMeta, LeafOrder};
use serde::Deserialize;

/// A linkage matrix plus one descriptor per leaf, in rendering order.
///
/// # Examples
/// ```
/// use dendrograph_cli::cli::Dataset;
///
/// let dataset: Dataset = serde_json::from_str(
///     r#"{"data": [[1, -1, -2, 0.3]],
///         "extras": [{"label": "a", "order": 1, "clust": 0},
///                    {"label": "b", "order": 2, "category": null}]}"#,
/// )?;
/// let (leaves, rows) = dataset.into_parts();
/// assert_eq!(leaves[0].category, Some(0));
/// assert_eq!(leaves[1].category, None);
/// assert_eq!(rows, vec![vec![1.0, -1.0, -2.0, 0.3]]);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    /// Raw `[merge_id, left, right, value]` rows.
    pub data: Vec<Vec<f64>>,
    /// Leaf descriptors.
    pub extras: Vec<LeafRecord>,
}

/// Leaf descriptor as written in a dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct LeafRecord {
    /// Display label.
    pub label: String,
    /// Leaf identifier referenced by the linkage rows.
    pub order: u64,
    /// Category of the leaf; absent or `null` when uncategorised.
    #[serde(default, alias = "category")]
    pub clust: Option<usize>,
}

impl Dataset {
    /// Splits the dataset into core leaf descriptors and raw rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<LeafMeta<usize>>, Vec<Vec<f64>>) {
        let leaves = self
            .extras
            .into_iter()
            .map(|leaf| LeafMeta::new(leaf.label, LeafOrder::new(leaf.order), leaf.clust))
            .collect();
        (leaves, self.data)
    }
}
