pub mod ast;
pub mod display;
pub mod domain;
pub mod eval;
pub mod sets;
pub mod simplify;
pub mod synonyms;

pub use ast::{Entity, Kind};
pub use domain::Domain;
