pub mod booking;
pub mod event;

pub use booking::{Booking, CreateBooking, UpdateBooking};
pub use event::{CreateEvent, Event, UpdateEvent};
