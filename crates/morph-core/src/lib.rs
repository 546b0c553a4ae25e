pub mod app;
pub mod camera;
pub mod color;
pub mod constants;
pub mod control;
pub mod detection;
pub mod error;
pub mod openness;
pub mod particles;
pub mod render;
pub mod shapes;
pub mod state;

pub use app::*;
pub use color::*;
pub use constants::*;
pub use control::*;
pub use detection::*;
pub use error::*;
pub use openness::*;
pub use particles::*;
pub use render::*;
pub use shapes::*;
pub use state::*;
