use sqlx::PgPool;

use crate::models::Cliente;
use crate::store::{StoreError, StoreResult};

pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Cliente>> {
        sqlx::query_as::<_, Cliente>(
            r#"
            SELECT c.id, c.vendedor_id, c.nombre, c.direccion, c.telefono, c.latitud,
                   c.longitud, c.notas, c.fecha_creacion, c.tipo_animal,
                   c.cantidad_animales, c.administracion,
                   COALESCE(ve.nombre, 'Desconocido') AS nombre_vendedor
            FROM clientes c
            LEFT JOIN vendedores ve ON ve.id = c.vendedor_id
            ORDER BY c.fecha_creacion DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Error listando clientes: {}", e)))
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error eliminando cliente: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("cliente {}", id)));
        }
        Ok(())
    }
}
