mod field;
mod model;
mod schema;

pub use field::*;
pub use model::*;
pub use schema::*;
