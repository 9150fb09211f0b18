//! Utilidades de validación
//!
//! Funciones helper para validar coordenadas, identificadores y
//! textos recibidos por la API.

use validator::ValidationError;

/// Validar que una latitud esté en [-90, 90]
pub fn validate_latitud(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
        let mut error = ValidationError::new("latitud");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que una longitud esté en [-180, 180]
pub fn validate_longitud(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
        let mut error = ValidationError::new("longitud");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normalizar un campo opcional: cadenas vacías se guardan como NULL
pub fn empty_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ranges() {
        assert!(validate_latitud(12.1364).is_ok());
        assert!(validate_latitud(-90.0).is_ok());
        assert!(validate_latitud(90.5).is_err());
        assert!(validate_latitud(f64::NAN).is_err());

        assert!(validate_longitud(-86.2514).is_ok());
        assert!(validate_longitud(180.0).is_ok());
        assert!(validate_longitud(-181.0).is_err());
    }

    #[test]
    fn test_not_empty_and_normalization() {
        assert!(validate_not_empty("Finca El Roble").is_ok());
        assert!(validate_not_empty("   ").is_err());

        assert_eq!(empty_to_none(Some("  ".to_string())), None);
        assert_eq!(empty_to_none(Some(" Masaya ".to_string())), Some("Masaya".to_string()));
        assert_eq!(empty_to_none(None), None);
    }
}
