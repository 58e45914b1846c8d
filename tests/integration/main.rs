//! HTTP-level integration tests.

mod helpers;

mod api_test;
mod fleet_test;
mod sales_test;
