pub mod age;
pub mod config;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod orchestrator;
