use sqlx::PgPool;

use crate::models::{EstadoPedido, NuevoPedido, Pedido};
use crate::store::{StoreError, StoreResult};
use crate::utils::validation::empty_to_none;

const PEDIDO_COLUMNS: &str = r#"
    p.id, p.vendedor_id, p.nombre_cliente, p.productos, p.monto_total,
    p.estado, p.fecha_creacion,
    COALESCE(ve.nombre, 'Desconocido') AS nombre_vendedor
"#;

pub struct PedidoRepository {
    pool: PgPool,
}

impl PedidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Pedido>> {
        let query = format!(
            r#"
            SELECT {}
            FROM pedidos p
            LEFT JOIN vendedores ve ON ve.id = p.vendedor_id
            ORDER BY p.fecha_creacion DESC
            "#,
            PEDIDO_COLUMNS
        );

        sqlx::query_as::<_, Pedido>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error listando pedidos: {}", e)))
    }

    pub async fn create(&self, nuevo: NuevoPedido) -> StoreResult<Pedido> {
        let monto = nuevo.monto();
        let query = format!(
            r#"
            WITH p AS (
                INSERT INTO pedidos (vendedor_id, nombre_cliente, productos, monto_total, estado)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {}
            FROM p
            LEFT JOIN vendedores ve ON ve.id = p.vendedor_id
            "#,
            PEDIDO_COLUMNS
        );

        sqlx::query_as::<_, Pedido>(&query)
            .bind(nuevo.vendedor_id)
            .bind(nuevo.nombre_cliente.trim())
            .bind(empty_to_none(nuevo.productos.clone()))
            .bind(monto)
            .bind(EstadoPedido::Pendiente.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error creando pedido: {}", e)))
    }

    pub async fn update_estado(&self, id: i64, estado: EstadoPedido) -> StoreResult<Pedido> {
        let query = format!(
            r#"
            WITH p AS (
                UPDATE pedidos SET estado = $2 WHERE id = $1 RETURNING *
            )
            SELECT {}
            FROM p
            LEFT JOIN vendedores ve ON ve.id = p.vendedor_id
            "#,
            PEDIDO_COLUMNS
        );

        sqlx::query_as::<_, Pedido>(&query)
            .bind(id)
            .bind(estado.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error actualizando pedido: {}", e)))?
            .ok_or_else(|| StoreError::NotFound(format!("pedido {}", id)))
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM pedidos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Error eliminando pedido: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("pedido {}", id)));
        }
        Ok(())
    }
}
