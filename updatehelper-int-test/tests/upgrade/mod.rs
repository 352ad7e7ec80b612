mod file_storage_test;
mod update_test_runner_test;
mod update_tester_test;
