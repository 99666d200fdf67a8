mod category;
mod product;
mod upload;

pub use category::*;
pub use product::*;
pub use upload::*;
