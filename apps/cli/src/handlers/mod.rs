pub mod manifest;
pub mod simulate;
pub mod systems;
