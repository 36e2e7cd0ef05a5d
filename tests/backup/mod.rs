//! Step definitions, fixtures and scenarios for backup behaviour.

mod bdd_steps;
mod scenarios;
mod test_doubles;
mod test_helpers;
