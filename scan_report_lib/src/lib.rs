pub mod frequency;
pub mod series;
pub mod summary;
pub mod view;
