use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourCliError {
    #[error(transparent)]
    Client(#[from] sourtimes::SourError),
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

pub type SourCliResult<T> = Result<T, SourCliError>;
