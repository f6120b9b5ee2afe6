// Domain layer - Readings, classifiers and the presentation model
pub mod connection;
pub mod export;
pub mod query;
pub mod reading;
pub mod view;
pub mod vitals;
