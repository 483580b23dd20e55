pub mod align;
pub mod canvas;
pub mod normalize;
