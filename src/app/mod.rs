//! 应用层：资源路由与应用组装

pub mod products;
pub mod users;

use std::sync::Arc;

use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::password::PasswordHasher;
use products::{PgProductRepository, ProductService};
use users::{PgUserRepository, UserService};

/// 请求间共享的状态，只有服务句柄，没有可变数据
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(user_service: UserService, product_service: ProductService) -> Self {
        Self {
            user_service,
            product_service,
        }
    }

    /// 基于 Postgres 连接池组装各仓储
    pub fn from_pool(pool: PgPool, hasher: Arc<dyn PasswordHasher>) -> Self {
        let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
        let product_repo = Arc::new(PgProductRepository::new(pool));
        Self::new(
            UserService::new(user_repo, hasher),
            ProductService::new(product_repo),
        )
    }
}

/// 创建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/users", users::handler::routes())
        .nest("/api/products", products::handler::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 启动服务，收到 Ctrl-C / SIGTERM 后停止接收新连接并返回
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("🚀 Server is running on http://{}", addr);
    info!("   /api/users    - list/get/create/update/delete, POST /api/users/login");
    info!("   /api/products - list/get/create/update/delete");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到停止信号，正在关闭服务...");
}
