pub mod collision;
pub mod constants;
pub mod engine;
pub mod generator;
pub mod obstacle;
pub mod obstacle_set;
pub mod observer;
pub mod outcome;
pub mod performance;
pub mod session;
pub mod snapshot;
pub mod track;
pub mod vehicle;
