use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use vendedores_tracking::config::EnvironmentConfig;
use vendedores_tracking::routes::create_app_router;
use vendedores_tracking::state::build_state;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🧭 App Vendedores - seguimiento de ubicación");
    info!("================================================");

    let parts = build_state(config.clone()).await.map_err(|e| {
        error!("❌ Error inicializando el estado: {}", e);
        e
    })?;
    let state = parts.state;

    // Tablero: sondeo periódico y suscripciones
    let runtime = state
        .dashboard
        .spawn_runtime(parts.feed, config.poll_interval)
        .await;

    let tracking = state.tracking.clone();
    let app = create_app_router(state);

    let addr = config.server_url();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", addr))?;

    info!("🚀 Servidor iniciado en http://{}", addr);
    info!("📋 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/dashboard - Tablero y estadísticas");
    info!("   POST /api/tracking/start - Iniciar seguimiento");
    info!("   POST /api/tracking/posicion - Posición del cliente");
    info!("   POST /api/ubicacion/registrar - Registro puntual");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    tracking.shutdown().await;
    runtime.shutdown();

    if let Err(e) = served {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
