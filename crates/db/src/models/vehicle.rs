//! Registered vehicles (cars, buses, trams, troleibuses) and persons.

use flower_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: DbId,
    pub vehicle_class: String,
    pub reg_nr: Option<String>,
    pub line: Option<String>,
}

#[derive(Debug)]
pub struct CreateVehicle {
    pub vehicle_class: String,
    pub reg_nr: Option<String>,
    pub line: Option<String>,
}
