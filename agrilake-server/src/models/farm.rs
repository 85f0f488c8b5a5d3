//! Farm records
//!
//! Wire names follow the field names already stored in existing farm
//! collections (`farmname`, `corpname`, `timestamplastwater`, `farmer`).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Field used by the farmer equality filter
pub const FARMER_FIELD: &str = "farmer";

/// Farmer attached to every record in the sample set
pub const SAMPLE_FARMER: &str = "Demo Farmer";

/// A single farm watering record. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmRecord {
    #[serde(rename = "farmname")]
    pub farm_name: String,

    #[serde(rename = "corpname")]
    pub crop_name: String,

    #[serde(rename = "timestamplastwater")]
    pub last_watered_at: DateTime<Utc>,

    #[serde(rename = "farmer")]
    pub farmer_name: String,
}

impl FarmRecord {
    pub fn new(
        farm_name: impl Into<String>,
        crop_name: impl Into<String>,
        last_watered_at: DateTime<Utc>,
        farmer_name: impl Into<String>,
    ) -> Self {
        Self {
            farm_name: farm_name.into(),
            crop_name: crop_name.into(),
            last_watered_at,
            farmer_name: farmer_name.into(),
        }
    }
}

/// Fixed demonstration records written by `POST /farms/sample`.
pub fn sample_farms() -> Vec<FarmRecord> {
    let day = |d: u32| {
        Utc.with_ymd_and_hms(2024, 9, d, 0, 0, 0)
            .single()
            .unwrap_or_default()
    };

    vec![
        FarmRecord::new("Green Valley Organic Farm", "Tomatoes", day(18), SAMPLE_FARMER),
        FarmRecord::new("Green Valley Organic Farm", "Corn", day(17), SAMPLE_FARMER),
        FarmRecord::new("Green Valley Organic Farm", "Wheat", day(16), SAMPLE_FARMER),
        FarmRecord::new("Mountain View Vineyard", "Cabernet Sauvignon", day(18), SAMPLE_FARMER),
        FarmRecord::new("Coastal Citrus Grove", "Oranges", day(18), SAMPLE_FARMER),
    ]
}
