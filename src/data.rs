//! Rate data handling

pub mod fx;
