pub mod convert;
pub mod currency;
pub mod interactive;
pub mod setup;
pub mod ui;
