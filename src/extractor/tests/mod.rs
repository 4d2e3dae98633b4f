mod property_tests;
mod traversal_tests;
