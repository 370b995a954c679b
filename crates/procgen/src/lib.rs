//! Procedural generation for the biome: the analytic height field, the seeded
//! generator, and static world layout (trees, bushes, debris, grass).

pub mod grass;
pub mod layout;
pub mod prng;
pub mod terrain;

pub use grass::*;
pub use layout::*;
pub use prng::*;
pub use terrain::*;
