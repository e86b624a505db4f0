//! Scripted stand-in for the car-rental site, answering the same selectors the
//! real pages expose so scenarios can be exercised without a browser.

use crate::{config::SuiteConfig, playwright_ext::RentalPage};
use anyhow::{bail, Result};
use async_trait::async_trait;
use demoaut_common::{
    catalog::{self, ResultOrder, Vehicle},
    price::format_brl,
    site, ReservationField,
};
use std::{collections::HashMap, sync::Mutex};
use url::Url;

const ORIGIN: &str = "http://127.0.0.1:8000";

pub(crate) fn test_config() -> SuiteConfig {
    let mut config = SuiteConfig::from_toml_str(include_str!("../../demoaut.toml")).unwrap();
    config.base_url = Url::parse(ORIGIN).unwrap();
    config.action_timeout_ms = 200;
    config
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    Blank,
    Home,
    Results { query: String, order: ResultOrder },
    Vehicle(u32),
    Reservation(u32),
}

struct State {
    location: Location,
    search_input: String,
    filters_open: bool,
    price_menu_open: bool,
    form: HashMap<ReservationField, String>,
    submitted: bool,
    actions: Vec<String>,
}

pub(crate) struct FakeSite {
    state: Mutex<State>,
    empty_catalog: bool,
    ignore_price_order: bool,
    price_label: Option<&'static str>,
    show_availability: bool,
    required_fields: usize,
    promoted: Option<u32>,
    inert_reserve_button: bool,
}

impl FakeSite {
    pub(crate) fn new() -> Self {
        FakeSite {
            state: Mutex::new(State {
                location: Location::Blank,
                search_input: String::new(),
                filters_open: false,
                price_menu_open: false,
                form: HashMap::new(),
                submitted: false,
                actions: Vec::new(),
            }),
            empty_catalog: false,
            ignore_price_order: false,
            price_label: None,
            show_availability: true,
            required_fields: ReservationField::ALL.len(),
            promoted: None,
            inert_reserve_button: false,
        }
    }

    pub(crate) fn with_empty_catalog(mut self) -> Self {
        self.empty_catalog = true;
        self
    }

    pub(crate) fn ignoring_price_order(mut self) -> Self {
        self.ignore_price_order = true;
        self
    }

    /// Renders every price as `label` instead of a formatted amount.
    pub(crate) fn with_price_label(mut self, label: &'static str) -> Self {
        self.price_label = Some(label);
        self
    }

    pub(crate) fn without_availability(mut self) -> Self {
        self.show_availability = false;
        self
    }

    /// Only the first `count` form fields are required.
    pub(crate) fn with_required_fields(mut self, count: usize) -> Self {
        self.required_fields = count;
        self
    }

    /// Lists vehicle `id` first in every result page.
    pub(crate) fn promoting(mut self, id: u32) -> Self {
        self.promoted = Some(id);
        self
    }

    /// "Reservar" is clickable but never leaves the details page.
    pub(crate) fn with_inert_reserve_button(mut self) -> Self {
        self.inert_reserve_button = true;
        self
    }

    pub(crate) fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    pub(crate) fn current_path(&self) -> String {
        path_of(&self.state.lock().unwrap().location)
    }

    pub(crate) fn required_messages(&self) -> usize {
        let state = self.state.lock().unwrap();
        if state.submitted {
            self.missing_fields(&state)
        } else {
            0
        }
    }

    fn results(&self, query: &str, order: ResultOrder) -> Vec<&'static Vehicle> {
        if self.empty_catalog {
            return Vec::new();
        }
        let order = if self.ignore_price_order {
            ResultOrder::Relevance
        } else {
            order
        };
        let mut vehicles = catalog::search(query, order);
        if let Some(id) = self.promoted {
            if let Some(vehicle) = catalog::find(id) {
                vehicles.retain(|listed| listed.id != id);
                vehicles.insert(0, vehicle);
            }
        }
        vehicles
    }

    fn price_text(&self, vehicle: &Vehicle) -> String {
        match self.price_label {
            Some(label) => label.to_string(),
            None => format_brl(vehicle.daily_price),
        }
    }

    fn missing_fields(&self, state: &State) -> usize {
        ReservationField::ALL
            .iter()
            .take(self.required_fields)
            .filter(|field| {
                state
                    .form
                    .get(*field)
                    .map_or(true, |value| value.trim().is_empty())
            })
            .count()
    }

    fn visible(&self, state: &State, selector: &str) -> bool {
        match &state.location {
            Location::Vehicle(_) => match selector {
                site::VEHICLE_DETAILS | site::VEHICLE_SPECS | site::RENTAL_PRICE => true,
                site::AVAILABILITY => self.show_availability,
                _ => false,
            },
            Location::Reservation(_) => match selector {
                site::RESERVATION_FORM => true,
                site::ERROR_MESSAGE => state.submitted && self.missing_fields(state) > 0,
                site::RESERVATION_CONFIRMATION => {
                    state.submitted && self.missing_fields(state) == 0
                }
                other => ReservationField::from_selector(other).is_some(),
            },
            Location::Results { order, .. } => match selector {
                site::SEARCH_RESULTS => true,
                site::LOWEST_PRICE_RESULTS => *order == ResultOrder::LowestPrice,
                _ => false,
            },
            Location::Home | Location::Blank => false,
        }
    }
}

fn path_of(location: &Location) -> String {
    match location {
        Location::Blank => String::new(),
        Location::Home => site::HOME_PATH.to_string(),
        Location::Results { .. } => "/caf/busca".to_string(),
        Location::Vehicle(id) => format!("/caf/veiculo/{}", id),
        Location::Reservation(id) => format!("/caf/reserva/{}", id),
    }
}

#[async_trait]
impl RentalPage for FakeSite {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(format!("goto {}", url));
        if Url::parse(url)?.path() != site::HOME_PATH {
            bail!("404 for {}", url);
        }
        state.location = Location::Home;
        state.search_input.clear();
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.actions.push(format!("fill {} = {}", selector, value));
        match (&state.location, ReservationField::from_selector(selector)) {
            (Location::Home | Location::Results { .. }, None) if selector == site::SEARCH_INPUT => {
                state.search_input = value.to_string();
            }
            (Location::Reservation(_), Some(field)) if !field.is_select() => {
                state.form.insert(field, value.to_string());
            }
            _ => bail!("no fillable element matches {}", selector),
        }
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.actions.push(format!("select {} = {}", selector, value));
        match (&state.location, ReservationField::from_selector(selector)) {
            (Location::Reservation(_), Some(field)) if field.is_select() => {
                state.form.insert(field, value.to_string());
                Ok(())
            }
            _ => bail!("no select element matches {}", selector),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(format!("click {}", selector));
        let location = state.location.clone();
        match (location, selector) {
            (Location::Home | Location::Results { .. }, site::SEARCH_BUTTON) => {
                state.location = Location::Results {
                    query: state.search_input.clone(),
                    order: ResultOrder::Relevance,
                };
                state.filters_open = false;
                state.price_menu_open = false;
            }
            (Location::Results { .. }, site::FILTERS) => state.filters_open = true,
            (Location::Results { .. }, site::PRICE_FILTER) if state.filters_open => {
                state.price_menu_open = true;
            }
            (Location::Results { query, .. }, site::LOWEST_PRICE) if state.price_menu_open => {
                state.location = Location::Results {
                    query,
                    order: ResultOrder::LowestPrice,
                };
            }
            (Location::Results { query, order }, site::FIRST_SEARCH_RESULT) => {
                match self.results(&query, order).first() {
                    Some(vehicle) => state.location = Location::Vehicle(vehicle.id),
                    None => bail!("no element matches {}", selector),
                }
            }
            (Location::Vehicle(_), site::RESERVE_BUTTON) if self.inert_reserve_button => {}
            (Location::Vehicle(id), site::RESERVE_BUTTON) => {
                state.location = Location::Reservation(id);
                state.form.clear();
                state.submitted = false;
            }
            (Location::Reservation(_), site::SUBMIT_BUTTON) => state.submitted = true,
            _ => bail!("no clickable element matches {}", selector),
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        let state = self.state.lock().unwrap();
        if !self.visible(&state, selector) {
            bail!("timed out waiting for {}", selector);
        }
        Ok(())
    }

    async fn text_contents(&self, selector: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let texts = match (&state.location, selector) {
            (Location::Results { query, order }, site::SEARCH_RESULT_ITEM) => self
                .results(query, *order)
                .into_iter()
                .map(|vehicle| format!("{} {}", vehicle.name, self.price_text(vehicle)))
                .collect(),
            (Location::Results { query, order }, site::PRICE_VALUE) => self
                .results(query, *order)
                .into_iter()
                .map(|vehicle| self.price_text(vehicle))
                .collect(),
            (Location::Vehicle(id), site::PRICE_VALUE) => catalog::find(*id)
                .map(|vehicle| self.price_text(vehicle))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        };
        Ok(texts)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.visible(&state, selector))
    }

    async fn count_visible_with_text(&self, selector: &str, text: &str) -> Result<usize> {
        let state = self.state.lock().unwrap();
        let count = match &state.location {
            Location::Reservation(_)
                if selector == site::ERROR_MESSAGE
                    && site::REQUIRED_FIELD.contains(text)
                    && state.submitted =>
            {
                self.missing_fields(&state)
            }
            _ => 0,
        };
        Ok(count)
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        Ok(format!("{}{}", ORIGIN, path_of(&state.location)))
    }
}
