//! Indicator calculation engine

pub mod calculator;
pub mod form;

pub use calculator::{
    CalculationResult, FsrInput, IfrInput, IndicatorFamily, IndicatorInput, IsrInput,
};
pub use form::{FormState, IndicatorForm};
