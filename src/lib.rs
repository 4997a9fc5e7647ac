pub mod config;
pub mod corpus;
pub mod landmark;
pub mod player;
pub mod render;
