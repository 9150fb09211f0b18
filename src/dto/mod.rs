pub mod api_response;
pub mod tracking_dto;

pub use api_response::ApiResponse;
pub use tracking_dto::{DashboardResponse, RegistrarUbicacionRequest, StartTrackingRequest};
