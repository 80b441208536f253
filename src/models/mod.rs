pub mod activity;
pub mod analysis;
pub mod commit;
pub mod contribution;
pub mod repository;

pub use activity::*;
pub use analysis::*;
pub use commit::*;
pub use contribution::*;
pub use repository::*;
