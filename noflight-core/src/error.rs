use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    /// Every planned tick has already been handed out. The planner never
    /// replans, so this means the caller kept ticking past the plan.
    Exhausted { served: usize },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { served } => {
                write!(f, "command schedule exhausted after {served} ticks")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
