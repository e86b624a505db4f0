pub mod catalog;
pub mod price;
pub mod reservation;
pub mod site;

pub use price::{is_ascending, parse_price, MalformedPrice, PriceParsing};
pub use reservation::{ReservationField, ReservationFormData};
