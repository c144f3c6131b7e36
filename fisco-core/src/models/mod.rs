mod annex;
mod cnae;
mod schedule;
mod termination;

pub use annex::Anexo;
pub use cnae::CnaeEntry;
pub use schedule::{RateBracket, RateSchedule, ScheduleError, ScheduleKind};
pub use termination::{NoticeType, TerminationType};
