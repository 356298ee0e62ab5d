pub mod align;
pub mod consts;
pub mod error;
pub mod exposure;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod region;
pub mod transform;
pub mod warp;
