use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::Vendedor;
use crate::store::{StoreError, StoreResult};

pub struct VendedorRepository {
    pool: PgPool,
}

impl VendedorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Vendedor>> {
        let vendedores = sqlx::query_as::<_, Vendedor>(
            r#"
            SELECT id, nombre, telefono, correo, latitud, longitud, estado,
                   ultima_actualizacion, fecha_creacion
            FROM vendedores
            ORDER BY nombre
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Error listando vendedores: {}", e)))?;

        Ok(vendedores)
    }

    pub async fn update_posicion(
        &self,
        id: i64,
        latitud: f64,
        longitud: f64,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE vendedores
            SET latitud = $2, longitud = $3, ultima_actualizacion = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(latitud)
        .bind(longitud)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Error actualizando posición: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("vendedor {}", id)));
        }

        log::debug!("📍 Posición de vendedor {} actualizada", id);
        Ok(())
    }
}
