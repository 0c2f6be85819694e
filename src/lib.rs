//! Land-area footprint of energy technologies around Bucaramanga.
//!
//! Each selected technology becomes a regular hexagon of its required
//! area, centered on the city, plus an area ranking. The pipeline is a
//! pure function of the selection and is rerun on every interaction.

pub mod app;
pub mod braille;
pub mod catalog;
pub mod config;
pub mod data;
pub mod export;
pub mod geo;
pub mod hash;
pub mod map;
pub mod report;
pub mod scene;
pub mod ui;
