pub mod extract;
pub mod session;
pub mod state;
pub mod widget;
