mod consolidated_book_tests;
mod consolidation_tests;
mod subscription_lifecycle_tests;
