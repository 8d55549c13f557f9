#[macro_use]
mod util;
mod store;
