//! Unweighted traversals over [`RouteGraph`](crate::model::RouteGraph).

mod bfs;
mod components;

pub use bfs::bfs_path;
pub use components::connected_components;
