mod operation;
mod profiling;
mod user;

pub use operation::*;
pub use profiling::*;
pub use user::*;
