mod dashboard_tests;
mod export_tests;
mod upload_tests;
