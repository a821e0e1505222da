//! Whole-flock behaviours, one per demo scene. Each combines per-vehicle
//! steering with fixed weights and implements [`crate::SteeringField`].

pub mod align_separate;
pub mod crowd;
pub mod flow_following;
pub mod path_following;
pub mod seek;
pub mod walls;

pub use align_separate::{AlignSeparate, AlignSeparateParams, FlockMode};
pub use crowd::{CrowdParams, CrowdPathFollowing, SeparationAndSeek, SeparationSeekParams};
pub use flow_following::{FlowFollowing, FlowParams};
pub use path_following::{PathFollowing, PathParams, SimplePathFollowing};
pub use seek::{SeekParams, SeekTarget};
pub use walls::{StayWithinWalls, WallsParams};
