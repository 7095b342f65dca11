//! Category-presence confidence scoring.

use crate::models::StructuredData;

/// Fixed weights per structured-data category.
const WEIGHTS: [(Category, u32); 5] = [
    (Category::PhoneNumbers, 20),
    (Category::Emails, 20),
    (Category::VehiclePlates, 30),
    (Category::VehicleMakes, 15),
    (Category::Amounts, 15),
];

#[derive(Debug, Clone, Copy)]
enum Category {
    PhoneNumbers,
    Emails,
    VehiclePlates,
    VehicleMakes,
    Amounts,
}

impl Category {
    fn is_populated(&self, data: &StructuredData) -> bool {
        match self {
            Category::PhoneNumbers => !data.phone_numbers.is_empty(),
            Category::Emails => !data.emails.is_empty(),
            Category::VehiclePlates => !data.vehicle_plates.is_empty(),
            Category::VehicleMakes => !data.vehicle_makes.is_empty(),
            Category::Amounts => !data.amounts.is_empty(),
        }
    }
}

/// Score how many expected field categories were populated, 0-100.
///
/// Each category contributes its full weight when its list is non-empty and
/// nothing otherwise; correctness of the values is not assessed.
pub fn calculate_confidence(data: &StructuredData) -> u8 {
    let mut earned = 0u32;
    let mut possible = 0u32;

    for (category, weight) in WEIGHTS {
        possible += weight;
        if category.is_populated(data) {
            earned += weight;
        }
    }

    if possible == 0 {
        return 0;
    }

    let score = (earned * 100 + possible / 2) / possible;
    score.min(100) as u8
}
