pub mod archive;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod generator;
pub mod interaction;
pub mod mesh;
pub mod orbit;
pub mod palette;
pub mod preferences;
pub mod scene;
pub mod shapes;
pub mod surface;
