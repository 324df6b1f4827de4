pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::Settings;
pub use core::birthday::{
    try_upcoming_birthdays, upcoming_birthdays, upcoming_birthdays_for, upcoming_birthdays_with_clock,
    BirthdayPolicy,
};
pub use core::date_offset::{days_until, days_until_json, days_until_with_clock, try_days_until};
pub use core::phone::{normalize_phone, normalize_phone_json, try_normalize_phone, PhonePolicy};
pub use core::ticket::{pick_ticket, pick_ticket_json, try_pick_ticket, TicketPolicy};
pub use domain::model::{Congratulation, PhoneRecord, TicketRequest, UserRecord};
pub use domain::ports::{Clock, FixedClock, SystemClock};
pub use utils::error::{Result, ToolkitError};
