//! Faceted restaurant search: query composition, result projection,
//! pagination and drill-down navigation over a pluggable [`traits::SearchClient`].

#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod facet;
pub mod filter;
pub mod navigation;
pub mod pagination;
pub mod params;
pub mod projection;
pub mod query;
pub mod traits;
pub mod types;
pub mod view;
