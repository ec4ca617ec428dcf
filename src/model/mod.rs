pub mod eval;
pub mod knn;

pub use eval::EvalReport;
pub use knn::{KnnConfig, KnnModel};
