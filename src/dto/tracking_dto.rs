use serde::{Deserialize, Serialize};

use crate::location::PositionReport;
use crate::services::{DashboardSnapshot, DashboardStats};

#[derive(Debug, Deserialize)]
pub struct StartTrackingRequest {
    #[serde(default)]
    pub vendedor_id: Option<i64>,
}

/// Registro puntual; sin `posicion` el cliente no soporta geolocalización
#[derive(Debug, Deserialize)]
pub struct RegistrarUbicacionRequest {
    pub vendedor_id: i64,
    #[serde(default)]
    pub posicion: Option<PositionReport>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
    pub stats: DashboardStats,
}

impl From<DashboardSnapshot> for DashboardResponse {
    fn from(snapshot: DashboardSnapshot) -> Self {
        let stats = snapshot.stats();
        Self { snapshot, stats }
    }
}
