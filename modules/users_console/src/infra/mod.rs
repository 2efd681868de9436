pub mod directory;
pub mod navigation;
pub mod notify;
pub mod session;
