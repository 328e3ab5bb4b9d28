pub mod investment;
pub mod loan;
pub mod portfolio;
