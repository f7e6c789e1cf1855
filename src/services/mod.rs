pub mod assets;
pub mod generator;
pub mod progress;
pub mod storage;
pub mod worker;
