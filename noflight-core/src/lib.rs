pub mod constants;
pub mod error;
pub mod flight;
pub mod geometry;
pub mod route;
pub mod schedule;
pub mod snapshot;
pub mod tangent;
pub mod turn;

pub use error::ScheduleError;
pub use geometry::{Heading, Position};
pub use route::{plan_route, Pose, RoutePlan, RouteStep};
pub use schedule::{AircraftPlan, Command, Scheduler};
pub use snapshot::{Aircraft, Airport, GameState};
