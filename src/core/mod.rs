pub mod fisher;
pub mod generate;
pub mod grid;
pub mod skysim;
pub mod special;
pub mod spectrum;
pub mod stats;
