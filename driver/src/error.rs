use error_stack::Report;
use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    SqlX(sqlx::Error),
    #[error(transparent)]
    Env(dotenvy::Error),
    #[error(transparent)]
    Conversion(anyhow::Error),
}

impl From<sqlx::Error> for DriverError {
    fn from(value: sqlx::Error) -> Self {
        Self::SqlX(value)
    }
}

impl From<dotenvy::Error> for DriverError {
    fn from(value: dotenvy::Error) -> Self {
        Self::Env(value)
    }
}

impl From<anyhow::Error> for DriverError {
    fn from(value: anyhow::Error) -> Self {
        Self::Conversion(value)
    }
}

/// Maps driver failures onto the kernel error vocabulary, preserving the
/// source chain in the report.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, DriverError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = kernel_context(&error);
            Report::from(error).change_context(context)
        })
    }
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(DriverError::from).convert_error()
    }
}

fn kernel_context(error: &DriverError) -> KernelError {
    match error {
        DriverError::SqlX(sqlx::Error::PoolTimedOut) => KernelError::Timeout,
        DriverError::SqlX(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            KernelError::Conflict
        }
        _ => KernelError::Internal,
    }
}
