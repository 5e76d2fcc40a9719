pub mod fixture;
pub mod text;
