use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read input file `{path}`: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read stdin: {0}")]
    ReadStdin(#[source] std::io::Error),
}
