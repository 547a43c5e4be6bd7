pub mod dimensions;
pub mod justified;
pub mod layout_cache;

pub use justified::{compute_layout, JustifiedLayout};
pub use layout_cache::{CachedLayoutComputer, LayoutCache};
