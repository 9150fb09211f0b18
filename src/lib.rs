//! Backend de App Vendedores
//!
//! Seguimiento de ubicación de vendedores en campo, tablero de visitas,
//! pedidos y clientes sobre un almacén de tablas remoto.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod location;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod tracking;
pub mod utils;
