pub mod block;
pub mod coord;
pub mod snapshot;
pub mod storage;

pub use block::{Block, BlockType, MaterialHandle};
pub use coord::BlockCoord;
pub use snapshot::WorldSnapshot;
pub use storage::{NullScene, SceneObserver, VoxelWorld};
