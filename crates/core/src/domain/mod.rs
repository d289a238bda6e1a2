pub mod garment;
pub mod profile;
pub mod weather;
