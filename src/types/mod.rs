pub mod asset;
pub mod chart;
pub mod history;
pub mod indicators;
pub mod notification;
pub mod signals;

pub use asset::*;
pub use chart::*;
pub use history::*;
pub use indicators::*;
pub use notification::*;
pub use signals::*;
