//! The fleet listed by the fixture site and its search rules.

use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: u32,
    pub name: &'static str,
    pub group: &'static str,
    pub specs: &'static [&'static str],
    pub daily_price: f64,
    pub available: bool,
}

pub const CATALOG: &[Vehicle] = &[
    Vehicle {
        id: 1,
        name: "Localiza Aluguel de Carros - Fiat Mobi",
        group: "Grupo A - Econômico",
        specs: &["4 portas", "Ar-condicionado", "Câmbio manual", "5 passageiros"],
        daily_price: 129.9,
        available: true,
    },
    Vehicle {
        id: 2,
        name: "Localiza Aluguel de Carros - Jeep Compass",
        group: "Grupo GX - SUV",
        specs: &["4 portas", "Ar-condicionado", "Câmbio automático", "Porta-malas 410 L"],
        daily_price: 389.0,
        available: true,
    },
    Vehicle {
        id: 3,
        name: "Localiza Aluguel de Carros - Chevrolet Onix",
        group: "Grupo C - Compacto",
        specs: &["4 portas", "Ar-condicionado", "Direção elétrica", "5 passageiros"],
        daily_price: 149.5,
        available: true,
    },
    Vehicle {
        id: 4,
        name: "Movida Aluguel de Carro - Renault Kwid",
        group: "Grupo A - Econômico",
        specs: &["4 portas", "Câmbio manual", "4 passageiros"],
        daily_price: 119.9,
        available: true,
    },
    Vehicle {
        id: 5,
        name: "Localiza Aluguel de Carros - Toyota Hilux",
        group: "Grupo PX - Picape",
        specs: &["Cabine dupla", "Tração 4x4", "Câmbio automático", "Diesel"],
        daily_price: 1049.9,
        available: false,
    },
    Vehicle {
        id: 6,
        name: "Localiza Aluguel de Carros - Hyundai HB20",
        group: "Grupo C - Compacto",
        specs: &["4 portas", "Ar-condicionado", "Multimídia", "5 passageiros"],
        daily_price: 139.0,
        available: true,
    },
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ResultOrder {
    #[default]
    Relevance,
    LowestPrice,
}

impl ResultOrder {
    /// Parses the `ordem` query parameter; unknown values keep relevance.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(crate::site::LOWEST_PRICE_ORDER) => ResultOrder::LowestPrice,
            _ => ResultOrder::Relevance,
        }
    }
}

pub fn find(id: u32) -> Option<&'static Vehicle> {
    CATALOG.iter().find(|vehicle| vehicle.id == id)
}

/// Vehicles matching at least one query term (three letters or more), most
/// matched terms first. Ties keep catalog order.
pub fn search(query: &str, order: ResultOrder) -> Vec<&'static Vehicle> {
    let terms: Vec<String> = query
        .split(|c: char| c.is_whitespace() || c == '+')
        .filter(|term| term.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect();

    let mut scored: Vec<(usize, &'static Vehicle)> = CATALOG
        .iter()
        .filter_map(|vehicle| {
            let haystack = format!("{} {}", vehicle.name, vehicle.group).to_lowercase();
            let score = terms
                .iter()
                .filter(|term| haystack.contains(term.as_str()))
                .count();
            (score > 0).then_some((score, vehicle))
        })
        .collect();
    scored.sort_by_key(|&(score, _)| Reverse(score));

    let mut results: Vec<_> = scored.into_iter().map(|(_, vehicle)| vehicle).collect();
    if order == ResultOrder::LowestPrice {
        results.sort_by(|a, b| a.daily_price.total_cmp(&b.daily_price));
    }
    results
}
