use chrono::{Local, NaiveDateTime};

/// Source of the current time
///
/// Competition dates are stored as naive local timestamps, so the clock returns local time too.
#[mockall::automock]
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
