pub mod forms;
pub mod map;
pub mod table;
pub mod utils;

pub use forms::*;
pub use map::*;
pub use table::*;
