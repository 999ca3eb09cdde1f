//! Engine inputs: fingerprints, task signals, tasks, and developers.

mod fingerprint;
mod signals;
mod task;

pub use fingerprint::{
    DomainExpertise, FrameworkSkill, LanguageSkill, LanguageVolume, SkillEntry, SkillFingerprint,
    SkillProfile, Trend,
};
pub use signals::{Complexity, TaskSignals};
pub use task::{parse_effort_hours, validate_tasks, Developer, Task};
