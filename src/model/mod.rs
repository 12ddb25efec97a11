pub mod claims;
pub mod listing;
pub mod polyline;
pub mod segment;
pub mod utils;

pub use claims::*;
pub use listing::*;
pub use segment::*;
pub use utils::*;
