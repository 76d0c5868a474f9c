pub mod meta;
pub mod toys;
