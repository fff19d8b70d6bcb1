mod movement_service_tests;
mod obligation_service_tests;
