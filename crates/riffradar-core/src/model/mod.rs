pub mod recommendation;
pub mod scored;
pub mod song;

pub use recommendation::{Recommendation, Tutorial};
pub use scored::ScoredMatch;
pub use song::{Difficulty, SongRecord};
