mod pg_file_record_repository;

pub use pg_file_record_repository::PgFileRecordRepository;
