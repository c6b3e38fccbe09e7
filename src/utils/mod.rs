pub mod data;
pub mod filters;
pub mod follow;
pub mod refresh;
pub mod transform;
