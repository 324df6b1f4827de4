pub mod birthday;
pub mod date_offset;
pub mod phone;
pub mod ticket;
