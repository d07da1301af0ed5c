mod bucket_tests;
mod histogram_tests;
