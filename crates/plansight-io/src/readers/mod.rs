pub mod csv;
pub mod infer;
