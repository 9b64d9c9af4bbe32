pub mod file;
pub mod stdin;

use serde_json::Value;
use tracing::debug;

/// Document given to a command: the `--input` file when set, otherwise
/// whatever is piped on stdin.
pub fn supplied_document(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            debug!(path, "reading input file");
            file::read_document(path).map(Some)
        }
        None => stdin::read_stdin(),
    }
}
