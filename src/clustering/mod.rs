// Keyword clustering: k-means over embedding vectors, a 2-D projection
// for plotting, and the column-per-cluster table.

pub mod kmeans;
pub mod projection;
pub mod table;
