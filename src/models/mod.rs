pub mod history;
pub mod record;
pub mod reference;

pub use history::*;
pub use record::*;
pub use reference::*;
