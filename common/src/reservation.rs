use serde::Deserialize;

/// Values typed into the reservation form. Nothing is validated here, the
/// page under test owns the required-field rules. Read from the
/// `[reservation]` table of the suite configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservationFormData {
    pub pickup_location: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub return_date: String,
    pub return_time: String,
}

impl ReservationFormData {
    pub fn sample() -> Self {
        ReservationFormData {
            pickup_location: "São Paulo - Aeroporto".to_string(),
            pickup_date: "2026-11-20".to_string(),
            pickup_time: "10:00".to_string(),
            return_date: "2026-11-27".to_string(),
            return_time: "18:00".to_string(),
        }
    }

    pub fn value(&self, field: ReservationField) -> &str {
        match field {
            ReservationField::PickupLocation => &self.pickup_location,
            ReservationField::PickupDate => &self.pickup_date,
            ReservationField::PickupTime => &self.pickup_time,
            ReservationField::ReturnDate => &self.return_date,
            ReservationField::ReturnTime => &self.return_time,
        }
    }

    /// `(field, value)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (ReservationField, &str)> + '_ {
        ReservationField::ALL
            .iter()
            .map(move |&field| (field, self.value(field)))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReservationField {
    PickupLocation,
    PickupDate,
    PickupTime,
    ReturnDate,
    ReturnTime,
}

impl ReservationField {
    pub const ALL: [ReservationField; 5] = [
        ReservationField::PickupLocation,
        ReservationField::PickupDate,
        ReservationField::PickupTime,
        ReservationField::ReturnDate,
        ReservationField::ReturnTime,
    ];

    /// Value of the element's `name` attribute.
    pub fn name(self) -> &'static str {
        match self {
            ReservationField::PickupLocation => "pickup-location",
            ReservationField::PickupDate => "pickup-date",
            ReservationField::PickupTime => "pickup-time",
            ReservationField::ReturnDate => "return-date",
            ReservationField::ReturnTime => "return-time",
        }
    }

    pub fn is_select(self) -> bool {
        matches!(
            self,
            ReservationField::PickupTime | ReservationField::ReturnTime
        )
    }

    pub fn selector(self) -> &'static str {
        match self {
            ReservationField::PickupLocation => r#"input[name="pickup-location"]"#,
            ReservationField::PickupDate => r#"input[name="pickup-date"]"#,
            ReservationField::PickupTime => r#"select[name="pickup-time"]"#,
            ReservationField::ReturnDate => r#"input[name="return-date"]"#,
            ReservationField::ReturnTime => r#"select[name="return-time"]"#,
        }
    }

    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.selector() == selector)
    }
}
