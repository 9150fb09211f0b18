//! Services module
//! 
//! Este módulo contiene la lógica de negocio de la aplicación: el tablero
//! reconciliado y el registro puntual de ubicación.

pub mod dashboard_service;
pub mod location_service;

pub use dashboard_service::{DashboardRuntime, DashboardService, DashboardSnapshot, DashboardStats};
pub use location_service::{LocationService, RegistroError, RegistroUbicacion, MSG_REGISTRADA};
