//! Vehicle classes tracked at semaphores and stations.
//!
//! Every crossing event is tagged with one of these classes. The string form
//! is what the `crossings.vehicle_class`, `vehicles.vehicle_class` and
//! `stations.vehicle_class` columns store (see the `create_traffic_tables` migration).

use serde::{Deserialize, Serialize};

pub const CLASS_CAR: &str = "CAR";
pub const CLASS_BUS: &str = "BUS";
pub const CLASS_TRAM: &str = "TRAM";
pub const CLASS_TROLEIBUS: &str = "TROLEIBUS";
pub const CLASS_PERSON: &str = "PERSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    Car,
    Bus,
    Tram,
    Troleibus,
    Person,
}

impl VehicleClass {
    /// All classes in the order they appear in volume payloads.
    pub const ALL: [VehicleClass; 5] = [
        VehicleClass::Car,
        VehicleClass::Bus,
        VehicleClass::Tram,
        VehicleClass::Troleibus,
        VehicleClass::Person,
    ];

    /// Public-transport classes, the only ones that stop at stations.
    pub const TRANSIT: [VehicleClass; 3] =
        [VehicleClass::Bus, VehicleClass::Tram, VehicleClass::Troleibus];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Car => CLASS_CAR,
            VehicleClass::Bus => CLASS_BUS,
            VehicleClass::Tram => CLASS_TRAM,
            VehicleClass::Troleibus => CLASS_TROLEIBUS,
            VehicleClass::Person => CLASS_PERSON,
        }
    }

    /// Parse the stored column value. Unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            CLASS_CAR => Some(VehicleClass::Car),
            CLASS_BUS => Some(VehicleClass::Bus),
            CLASS_TRAM => Some(VehicleClass::Tram),
            CLASS_TROLEIBUS => Some(VehicleClass::Troleibus),
            CLASS_PERSON => Some(VehicleClass::Person),
            _ => None,
        }
    }

    /// Label used in CSV exports (`Car`, `Bus`, ...).
    pub fn label(self) -> &'static str {
        match self {
            VehicleClass::Car => "Car",
            VehicleClass::Bus => "Bus",
            VehicleClass::Tram => "Tram",
            VehicleClass::Troleibus => "Troleibus",
            VehicleClass::Person => "Person",
        }
    }

    pub fn has_stations(self) -> bool {
        Self::TRANSIT.contains(&self)
    }
}

/// Crossing counts per vehicle class plus their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeCounts {
    pub cars: i64,
    pub buses: i64,
    pub trams: i64,
    pub troleibuses: i64,
    pub persons: i64,
    pub total: i64,
}

impl VolumeCounts {
    /// Add `count` crossings of `class`, keeping `total` in step.
    pub fn add(&mut self, class: VehicleClass, count: i64) {
        match class {
            VehicleClass::Car => self.cars += count,
            VehicleClass::Bus => self.buses += count,
            VehicleClass::Tram => self.trams += count,
            VehicleClass::Troleibus => self.troleibuses += count,
            VehicleClass::Person => self.persons += count,
        }
        self.total += count;
    }

    /// Fold `(class column, count)` rows into a counts object.
    ///
    /// Rows with an unrecognised class are ignored rather than failing the
    /// whole aggregation.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut counts = Self::default();
        for (class, count) in rows {
            if let Some(class) = VehicleClass::parse(class) {
                counts.add(class, count);
            }
        }
        counts
    }
}
