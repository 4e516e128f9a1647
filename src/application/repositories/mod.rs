pub mod file_record_repository;
