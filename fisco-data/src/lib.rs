pub mod loader;

pub use loader::{
    CnaeLoader, CnaeLoaderError, CnaeRecord, ScheduleLoader, ScheduleLoaderError, ScheduleRecord,
};
