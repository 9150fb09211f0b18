use sqlx::PgPool;

use crate::models::{NuevaUbicacion, Ubicacion};
use crate::store::{StoreError, StoreResult};

pub struct UbicacionRepository {
    pool: PgPool,
}

impl UbicacionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, nueva: NuevaUbicacion) -> StoreResult<Ubicacion> {
        let ubicacion = sqlx::query_as::<_, Ubicacion>(
            r#"
            INSERT INTO ubicaciones (vendedor_id, latitud, longitud, precision, fecha_registro)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, vendedor_id, latitud, longitud, precision, fecha_registro
            "#,
        )
        .bind(nueva.vendedor_id)
        .bind(nueva.latitud)
        .bind(nueva.longitud)
        .bind(nueva.precision)
        .bind(nueva.fecha_registro)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Error insertando ubicación: {}", e)))?;

        Ok(ubicacion)
    }
}
