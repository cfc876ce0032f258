use crate::error::Error as FetchErr;
pub type Result<T> = std::result::Result<T, FetchErr>;
