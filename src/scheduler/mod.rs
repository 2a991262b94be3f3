//! Background jobs run on a cron schedule.

pub mod rate_limit_sweep;
