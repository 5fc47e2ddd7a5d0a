//! Pure helpers behind the lesson player.
//!
//! - [`CurriculumOutline`]: ordered modules and lessons; answers "what comes
//!   next" across module boundaries.
//! - [`select_variant`]: picks the scenario variant written for a learner's
//!   goal.
//! - [`project_growth`]: the compound-interest table shown in the
//!   visualization steps.

pub mod growth;
pub mod outline;
pub mod scenario;

pub use growth::{GrowthParams, SimulationError, YearProjection, project_growth};
pub use outline::{CurriculumOutline, LessonPosition, ModuleOutline};
pub use scenario::{ScenarioVariant, select_variant};
