//! Utilidades del sistema
//!
//! Manejo de errores HTTP y validación de datos de entrada.

pub mod errors;
pub mod validation;
