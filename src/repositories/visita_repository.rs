use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{EstadoVisita, NuevaVisita, Visita};
use crate::store::{StoreError, StoreResult};
use crate::utils::validation::empty_to_none;

// Columnas de visitas con el nombre del vendedor unido
const VISITA_COLUMNS: &str = r#"
    v.id, v.vendedor_id, v.nombre_cliente, v.direccion, v.notas, v.tipo_visita,
    v.estado, v.fecha_creacion, v.fecha_completado,
    COALESCE(ve.nombre, 'Desconocido') AS nombre_vendedor
"#;

pub struct VisitaRepository {
    pool: PgPool,
}

impl VisitaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Visita>> {
        let query = format!(
            r#"
            SELECT {}
            FROM visitas v
            LEFT JOIN vendedores ve ON ve.id = v.vendedor_id
            ORDER BY v.fecha_creacion DESC
            "#,
            VISITA_COLUMNS
        );

        sqlx::query_as::<_, Visita>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error listando visitas: {}", e)))
    }

    pub async fn create(&self, nueva: NuevaVisita) -> StoreResult<Visita> {
        let query = format!(
            r#"
            WITH v AS (
                INSERT INTO visitas (vendedor_id, nombre_cliente, direccion, notas, tipo_visita, estado)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {}
            FROM v
            LEFT JOIN vendedores ve ON ve.id = v.vendedor_id
            "#,
            VISITA_COLUMNS
        );

        sqlx::query_as::<_, Visita>(&query)
            .bind(nueva.vendedor_id)
            .bind(nueva.nombre_cliente.trim())
            .bind(empty_to_none(nueva.direccion))
            .bind(empty_to_none(nueva.notas))
            .bind(nueva.tipo_visita.as_str())
            .bind(EstadoVisita::Pendiente.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error creando visita: {}", e)))
    }

    pub async fn update_estado(
        &self,
        id: i64,
        estado: EstadoVisita,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> StoreResult<Visita> {
        let query = format!(
            r#"
            WITH v AS (
                UPDATE visitas
                SET estado = $2, fecha_completado = COALESCE($3, fecha_completado)
                WHERE id = $1
                RETURNING *
            )
            SELECT {}
            FROM v
            LEFT JOIN vendedores ve ON ve.id = v.vendedor_id
            "#,
            VISITA_COLUMNS
        );

        sqlx::query_as::<_, Visita>(&query)
            .bind(id)
            .bind(estado.as_str())
            .bind(fecha_completado)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error actualizando visita: {}", e)))?
            .ok_or_else(|| StoreError::NotFound(format!("visita {}", id)))
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM visitas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error eliminando visita: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("visita {}", id)));
        }
        Ok(())
    }
}
