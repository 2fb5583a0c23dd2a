use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no keyframes found in action `{clip}`")]
    NoKeyframes { clip: String },

    #[error("parent of bone `{bone}` has no inverse at frame {frame}")]
    SingularMatrix { bone: String, frame: i32 },

    #[error("hold from frame {frame} to {next} does not fit a frame count")]
    HoldOverflow { frame: i32, next: i32 },

    #[error("failed to seek to frame {frame}: {reason}")]
    Seek { frame: i32, reason: String },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed animation text: {0}")]
    Parse(String),

    #[error("failed to render animation text: {0}")]
    Render(String),

    #[error("malformed bvh: {0}")]
    Bvh(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
