//! The car-rental user flows. Every scenario starts from the home page and
//! runs its steps strictly one after another.

mod details;
mod filters;
mod reservation;
mod search;

#[cfg(test)]
mod fake;

pub use details::show_vehicle_details;
pub use filters::filter_by_lowest_price;
pub use reservation::{complete_reservation_form, start_reservation, validate_required_fields};
pub use search::search_available_cars;

pub const LOCALIZA_SEARCH: &str = "Alugar Carro Localiza";
pub const GENERIC_SEARCH: &str = "Alugar Carro";
