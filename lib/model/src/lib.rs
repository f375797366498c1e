mod path;
mod term;
mod triple;
pub mod vocab;

pub use path::*;
pub use term::*;
pub use triple::*;
