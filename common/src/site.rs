//! Selectors and texts of the car-rental site, shared by the scenarios and
//! the local fixture that serves the same markup.

pub const HOME_PATH: &str = "/caf/";
pub const RESERVATION_PATH_FRAGMENT: &str = "reserva";

pub const SEARCH_INPUT: &str = r#"input[placeholder="Pesquisar"]"#;
pub const SEARCH_BUTTON: &str = "button.search-button";
pub const SEARCH_RESULTS: &str = ".search-results";
pub const SEARCH_RESULT_ITEM: &str = ".search-result-item";
pub const FIRST_SEARCH_RESULT: &str = ".search-result-item >> nth=0";
pub const PRICE_VALUE: &str = ".price-value";

pub const FILTERS: &str = r#"text="Filtros""#;
pub const PRICE_FILTER: &str = r#"text="Preço""#;
pub const LOWEST_PRICE: &str = r#"text="Menor Preço""#;
/// Result list once the lowest-price ordering has been applied.
pub const LOWEST_PRICE_RESULTS: &str = r#".search-results[data-ordem="menor-preco"]"#;
pub const LOWEST_PRICE_ORDER: &str = "menor-preco";

pub const VEHICLE_DETAILS: &str = ".vehicle-details";
pub const VEHICLE_SPECS: &str = ".vehicle-specs";
pub const RENTAL_PRICE: &str = ".rental-price";
pub const AVAILABILITY: &str = ".availability";
pub const RESERVE_BUTTON: &str = r#"button:has-text("Reservar")"#;

pub const RESERVATION_FORM: &str = "form.reservation-form";
pub const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;
pub const ERROR_MESSAGE: &str = ".error-message";
pub const REQUIRED_FIELD: &str = "Campo obrigatório";
pub const RESERVATION_CONFIRMATION: &str = ".reservation-confirmation";
