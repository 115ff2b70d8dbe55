//! HTTP surface of the dashboard
//!
//! Routes keep the names the browser front-ends already call
//! (`/clientes`, `/perfil_clusters`, ...).

pub mod responses;
pub mod server;

pub use responses::*;
pub use server::{router, serve, DashboardApiServer, ENDPOINTS};
