#[derive(Debug)]
pub enum ApplicationError {
    NotFound,
    BadRequest(String),
    UnsupportedMediaType(String),
    Conflict(String),
    InvalidPath(String),
    StorageFailure(String),
    DatabaseError(String),
}
