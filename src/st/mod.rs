pub mod backing_array;
pub mod store;

pub use self::store::Store;
