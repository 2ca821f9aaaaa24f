pub mod gesture;
pub mod grid;

pub use gesture::*;
pub use grid::*;
