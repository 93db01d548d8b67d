//! Error type shared by every stage of a prime scan.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    /// The OS refused to start an execution unit.
    #[error("failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    /// A chunk scan panicked. `chunk` is `None` when the strategy cannot
    /// tell which chunk was running.
    #[error("worker panicked while scanning {}", describe_chunk(.chunk))]
    WorkerPanicked { chunk: Option<usize> },

    #[error("chunk {chunk} delivered more than once")]
    DuplicateResult { chunk: usize },

    #[error("result for chunk {chunk} does not belong to this run")]
    UnknownChunk { chunk: usize },

    #[error("chunk {chunk} never delivered a result")]
    MissingResult { chunk: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_chunk(chunk: &Option<usize>) -> String {
    match chunk {
        Some(index) => format!("chunk {}", index),
        None => "an unknown chunk".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_names_chunk() {
        let known = FinderError::WorkerPanicked { chunk: Some(3) };
        assert_eq!(known.to_string(), "worker panicked while scanning chunk 3");

        let unknown = FinderError::WorkerPanicked { chunk: None };
        assert_eq!(
            unknown.to_string(),
            "worker panicked while scanning an unknown chunk"
        );
    }

    #[test]
    fn test_pool_build_error_keeps_source() {
        // Only the first global pool build can succeed
        let _ = rayon::ThreadPoolBuilder::new().num_threads(1).build_global();
        let build_err = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build_global()
            .unwrap_err();

        let err = FinderError::from(build_err);
        assert!(matches!(err, FinderError::PoolBuild(_)));
        assert!(err.to_string().starts_with("failed to build worker pool: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_spawn_error_keeps_source() {
        let err = FinderError::WorkerSpawn {
            worker: 2,
            source: io::Error::new(io::ErrorKind::WouldBlock, "no threads left"),
        };
        assert!(err.to_string().contains("worker 2"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
