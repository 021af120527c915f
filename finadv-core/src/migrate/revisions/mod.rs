//! Revision scripts, registered in one place
//!
//! Add a new revision by creating a module, pointing its `down_revision` at
//! the current head and listing it in `all()`.

mod m001_create_income_table;
mod m002_create_debt_table;

use super::{Migration, MigrationChain, MigrationError};

/// Every revision known to the application, in no particular order.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(m001_create_income_table::CreateIncomeTable),
        Box::new(m002_create_debt_table::CreateDebtTable),
    ]
}

/// The validated application chain.
pub fn chain() -> Result<MigrationChain, MigrationError> {
    MigrationChain::new(all())
}
