pub mod flow;
pub mod modal;
pub mod model;
