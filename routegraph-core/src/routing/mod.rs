//! Weighted routing over cleaned graphs

mod dijkstra;

pub use dijkstra::{ShortestPath, shortest_path, shortest_path_by_id};
