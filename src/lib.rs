#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod access;
pub mod notify;
pub mod ledger;
pub mod ops;
pub mod queries;
pub mod export;
