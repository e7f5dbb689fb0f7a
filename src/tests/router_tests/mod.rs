mod channel_tests;
mod dashboard_tests;
mod snapshot_tests;
