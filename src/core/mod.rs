pub mod errors;
pub mod width;
pub mod weighted;
pub mod counter;

pub use self::counter::Counter;
pub use self::errors::*;
pub use self::weighted::WeightedCell;
pub use self::width::Width;
