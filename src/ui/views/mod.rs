pub mod encounter;
pub mod load_failed;
pub mod map;
pub mod results;
